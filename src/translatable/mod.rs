//! Translatable attribute store.
//!
//! - `field`: `TranslatableField<T>`, the locale→value map and its
//!   resolution policy
//! - `languages`: `LanguageSet`, the per-record list of populated locales
//! - `record`: `TranslatableRecord`, the shared capability that keeps both
//!   in step

mod field;
mod languages;
mod record;

pub use field::{Fallback, LocaleKeys, TranslatableField};
pub use languages::{DuplicateLocale, LanguageSet};
pub use record::TranslatableRecord;
