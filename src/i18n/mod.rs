//! Internationalization (i18n) module for multi-language catalog content.
//!
//! This module holds everything about locales that is independent of the
//! translated records themselves.
//!
//! # Architecture
//!
//! - `locale`: Validated `Locale` code type
//! - `registry`: Supported-locale allow-list, default and fallback locale
//! - `context`: Request-scoped `LocaleContext` passed to every resolved read
//! - `metrics`: Counters for which resolution step answered a read
//!
//! # Example
//!
//! ```
//! use catalog_i18n::i18n::LocaleRegistry;
//!
//! let registry = LocaleRegistry::new(["en", "fr"], "en", "en").unwrap();
//! let ctx = registry.negotiate("fr-CA, en;q=0.5");
//! assert_eq!(ctx.current().code(), "fr");
//! ```

mod context;
mod locale;
mod metrics;
mod registry;

pub use context::LocaleContext;
pub use locale::{Locale, LocaleError};
pub use metrics::{MetricsReport, ResolutionMetrics, ResolvedFrom};
pub use registry::{is_well_formed, LocaleRegistry};
