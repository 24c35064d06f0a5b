//! Locale registry: the supported-locale allow-list.
//!
//! The registry is the single source of truth for which locales the catalog
//! accepts on writes, which locale a request reads in when it asks for none,
//! and which locale fallback-enabled fields fall back to. It is built from
//! [`Config`](crate::config::Config) and handed around by reference rather
//! than stored in a global.

use crate::i18n::{Locale, LocaleContext, LocaleError, ResolutionMetrics};
use regex::Regex;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Shape accepted for configured locale codes (`en`, `pt-BR`, `zh_Hant`).
static LOCALE_CODE: OnceLock<Regex> = OnceLock::new();

fn locale_code_regex() -> &'static Regex {
    LOCALE_CODE.get_or_init(|| {
        Regex::new(r"^[A-Za-z]{2,3}([-_][A-Za-z0-9]{2,8})*$").expect("locale pattern is valid")
    })
}

/// Check that a code looks like a locale tag.
///
/// Only configuration is held to this; translation maps accept any
/// non-empty key.
pub fn is_well_formed(code: &str) -> bool {
    locale_code_regex().is_match(code)
}

/// Supported locales plus the default and fallback locale.
#[derive(Debug, Clone)]
pub struct LocaleRegistry {
    supported: Vec<Locale>,
    default: Locale,
    fallback: Locale,
    metrics: Option<Arc<ResolutionMetrics>>,
}

impl LocaleRegistry {
    /// Build a registry.
    ///
    /// # Arguments
    /// * `supported` - Allowed locale codes, in preference order
    /// * `default` - Locale used when a request names none; must be supported
    /// * `fallback` - Locale consulted by fallback-enabled fields
    ///
    /// # Returns
    /// * `Err(LocaleError::Malformed)` if any code is not a locale tag
    /// * `Err(LocaleError::Unsupported)` if `default` is not in `supported`
    pub fn new<I, S>(supported: I, default: &str, fallback: &str) -> Result<Self, LocaleError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut locales: Vec<Locale> = Vec::new();
        for code in supported {
            let locale = Self::well_formed(code.as_ref())?;
            if !locales.contains(&locale) {
                locales.push(locale);
            }
        }

        let default = Self::well_formed(default)?;
        let fallback = Self::well_formed(fallback)?;

        if !locales.contains(&default) {
            return Err(LocaleError::Unsupported(default.code().to_string()));
        }

        Ok(Self {
            supported: locales,
            default,
            fallback,
            metrics: None,
        })
    }

    /// Attach a recorder that every context built by this registry counts
    /// its resolved reads in.
    pub fn with_metrics(mut self, metrics: Arc<ResolutionMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn metrics(&self) -> Option<&ResolutionMetrics> {
        self.metrics.as_deref()
    }

    fn context_for(&self, current: Locale) -> LocaleContext {
        let ctx = LocaleContext::new(current, self.fallback.clone());
        match &self.metrics {
            Some(metrics) => ctx.with_metrics(Arc::clone(metrics)),
            None => ctx,
        }
    }

    fn well_formed(code: &str) -> Result<Locale, LocaleError> {
        let locale = Locale::new(code.trim())?;
        if !is_well_formed(locale.code()) {
            return Err(LocaleError::Malformed(locale.code().to_string()));
        }
        Ok(locale)
    }

    /// All supported locales, in configured order.
    pub fn supported(&self) -> &[Locale] {
        &self.supported
    }

    pub fn default_locale(&self) -> &Locale {
        &self.default
    }

    pub fn fallback_locale(&self) -> &Locale {
        &self.fallback
    }

    /// Check if a locale code is in the allow-list.
    pub fn is_supported(&self, code: &str) -> bool {
        self.find(code).is_some()
    }

    fn find(&self, code: &str) -> Option<&Locale> {
        self.supported
            .iter()
            .find(|locale| locale.code().eq_ignore_ascii_case(code.trim()))
    }

    /// Boundary validation for incoming writes.
    ///
    /// Returns the registry's own spelling of the locale so that stored keys
    /// stay consistent regardless of the caller's casing.
    pub fn validate(&self, code: &str) -> Result<Locale, LocaleError> {
        if code.trim().is_empty() {
            return Err(LocaleError::Empty);
        }
        self.find(code)
            .cloned()
            .ok_or_else(|| LocaleError::Unsupported(code.trim().to_string()))
    }

    /// Context for a request that may have asked for a locale.
    ///
    /// Unsupported or missing requests resolve to the default locale.
    pub fn context(&self, requested: Option<&str>) -> LocaleContext {
        let current = match requested.and_then(|code| self.find(code)) {
            Some(locale) => locale.clone(),
            None => {
                if let Some(code) = requested {
                    debug!("Requested locale '{}' is not supported, using default", code);
                }
                self.default.clone()
            }
        };
        self.context_for(current)
    }

    /// Context for a request carrying an `Accept-Language` header value.
    ///
    /// Ranges are tried in descending q-value order (ties keep header order).
    /// A range matches a supported locale exactly or by primary subtag;
    /// `*` and an exhausted list select the default locale.
    pub fn negotiate(&self, accept_language: &str) -> LocaleContext {
        let mut ranges: Vec<(&str, f32)> = accept_language
            .split(',')
            .filter_map(parse_language_range)
            .filter(|(_, q)| *q > 0.0)
            .collect();
        ranges.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        for (range, _) in ranges {
            if range == "*" {
                break;
            }
            if let Some(locale) = self.match_range(range) {
                return self.context_for(locale.clone());
            }
        }

        self.context_for(self.default.clone())
    }

    fn match_range(&self, range: &str) -> Option<&Locale> {
        if let Some(exact) = self.find(range) {
            return Some(exact);
        }
        let primary = range.split(['-', '_']).next().unwrap_or(range);
        self.supported
            .iter()
            .find(|locale| locale.primary().eq_ignore_ascii_case(primary))
    }
}

/// Parse one `tag;q=0.8` entry of an `Accept-Language` header.
fn parse_language_range(entry: &str) -> Option<(&str, f32)> {
    let mut parts = entry.split(';');
    let tag = parts.next()?.trim();
    if tag.is_empty() {
        return None;
    }

    let mut quality = 1.0;
    for param in parts {
        if let Some(value) = param.trim().strip_prefix("q=") {
            let q: f32 = value.trim().parse().ok()?;
            if !q.is_finite() {
                return None;
            }
            quality = q.clamp(0.0, 1.0);
        }
    }
    Some((tag, quality))
}
