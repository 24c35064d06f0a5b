//! Request-scoped locale context.

use crate::i18n::{Locale, ResolutionMetrics, ResolvedFrom};
use std::sync::Arc;

/// The locales a single request reads translations in.
///
/// Built once per request by [`LocaleRegistry`](crate::i18n::LocaleRegistry)
/// and passed explicitly to every resolved read, so resolution never consults
/// global state. A context may carry a [`ResolutionMetrics`] recorder; reads
/// through a context without one record nothing.
#[derive(Debug, Clone)]
pub struct LocaleContext {
    current: Locale,
    fallback: Locale,
    metrics: Option<Arc<ResolutionMetrics>>,
}

impl LocaleContext {
    pub fn new(current: Locale, fallback: Locale) -> Self {
        Self {
            current,
            fallback,
            metrics: None,
        }
    }

    /// Count every resolved read through this context in `metrics`.
    pub fn with_metrics(mut self, metrics: Arc<ResolutionMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// The active locale for this request.
    pub fn current(&self) -> &Locale {
        &self.current
    }

    /// The configured fallback locale. Only fields that opt into fallback
    /// resolution look at it.
    pub fn fallback(&self) -> &Locale {
        &self.fallback
    }

    pub fn metrics(&self) -> Option<&ResolutionMetrics> {
        self.metrics.as_deref()
    }

    /// Record one resolution outcome if a recorder is attached.
    pub fn record(&self, outcome: Option<ResolvedFrom>) {
        if let Some(metrics) = &self.metrics {
            metrics.record(outcome);
        }
    }

    /// Same context with a different active locale.
    pub fn with_current(&self, current: Locale) -> Self {
        Self {
            current,
            fallback: self.fallback.clone(),
            metrics: self.metrics.clone(),
        }
    }
}
