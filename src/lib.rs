//! Translatable attributes for catalog records.
//!
//! Catalog entities (categories, products, variants, kits, usage guides)
//! carry fields stored once per locale. Reads resolve against a display
//! locale, the request locale and, for variant options, a fallback locale.
//! Each record tracks the locales it has been translated into.

pub mod audit;
pub mod catalog;
pub mod config;
pub mod db;
pub mod i18n;
pub mod translatable;
