//! Resolution metrics and observability module.
//!
//! Counts which step of the locale resolution chain answered each read, so
//! that gaps in catalog translations show up as fallback hits and misses.
//! A recorder is attached to a [`LocaleContext`](crate::i18n::LocaleContext);
//! there is no process-wide instance.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// The step of the resolution chain that produced a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvedFrom {
    /// The instance's display-locale override
    Display,
    /// The request's current locale
    Current,
    /// The configured fallback locale
    Fallback,
}

/// Translation resolution counters.
#[derive(Debug, Default)]
pub struct ResolutionMetrics {
    /// Reads answered by the display-locale override
    display_hits: AtomicUsize,

    /// Reads answered by the current locale
    current_hits: AtomicUsize,

    /// Reads answered by the fallback locale
    fallback_hits: AtomicUsize,

    /// Reads that found nothing and returned an empty value
    misses: AtomicUsize,
}

impl ResolutionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one resolved read (`None` is a miss).
    pub fn record(&self, outcome: Option<ResolvedFrom>) {
        let counter = match outcome {
            Some(ResolvedFrom::Display) => &self.display_hits,
            Some(ResolvedFrom::Current) => &self.current_hits,
            Some(ResolvedFrom::Fallback) => &self.fallback_hits,
            None => &self.misses,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn display_hits(&self) -> usize {
        self.display_hits.load(Ordering::Relaxed)
    }

    pub fn current_hits(&self) -> usize {
        self.current_hits.load(Ordering::Relaxed)
    }

    pub fn fallback_hits(&self) -> usize {
        self.fallback_hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let display_hits = self.display_hits();
        let current_hits = self.current_hits();
        let fallback_hits = self.fallback_hits();
        let misses = self.misses();

        let total = display_hits + current_hits + fallback_hits + misses;
        let miss_rate = if total > 0 {
            (misses as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            display_hits,
            current_hits,
            fallback_hits,
            misses,
            total_reads: total,
            miss_rate,
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.display_hits.store(0, Ordering::Relaxed);
        self.current_hits.store(0, Ordering::Relaxed);
        self.fallback_hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}

/// Snapshot of the resolution counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub display_hits: usize,
    pub current_hits: usize,
    pub fallback_hits: usize,
    pub misses: usize,
    pub total_reads: usize,

    /// Share of reads that resolved to an empty value, as a percentage (0-100)
    pub miss_rate: f64,
}
