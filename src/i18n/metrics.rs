//! Lookup metrics for the translation resolver.
//!
//! Counts how often display strings resolve directly, via the canonical
//! fallback, or not at all. A non-zero miss count means some screen is
//! rendering raw keys.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters owned by a single [`Translator`](crate::i18n::Translator).
#[derive(Debug, Default)]
pub struct LookupMetrics {
    /// Total number of lookups
    lookups: AtomicUsize,

    /// Lookups answered by the canonical locale instead of the current one
    fallbacks: AtomicUsize,

    /// Lookups that returned the raw key
    misses: AtomicUsize,
}

/// Snapshot of lookup metrics.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LookupReport {
    pub lookups: usize,
    pub fallbacks: usize,
    pub misses: usize,
    /// Percentage of lookups that returned the raw key
    pub miss_rate: f64,
}

impl LookupMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_lookup(&self) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }

    pub fn fallbacks(&self) -> usize {
        self.fallbacks.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> LookupReport {
        let lookups = self.lookups();
        let misses = self.misses();
        let miss_rate = if lookups > 0 {
            (misses as f64 / lookups as f64) * 100.0
        } else {
            0.0
        };

        LookupReport {
            lookups,
            fallbacks: self.fallbacks(),
            misses,
            miss_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_metrics_are_zero() {
        let metrics = LookupMetrics::new();
        let report = metrics.report();
        assert_eq!(report.lookups, 0);
        assert_eq!(report.fallbacks, 0);
        assert_eq!(report.misses, 0);
        assert_eq!(report.miss_rate, 0.0);
    }

    #[test]
    fn test_miss_rate() {
        let metrics = LookupMetrics::new();
        for _ in 0..4 {
            metrics.record_lookup();
        }
        metrics.record_miss();
        metrics.record_fallback();

        let report = metrics.report();
        assert_eq!(report.lookups, 4);
        assert_eq!(report.fallbacks, 1);
        assert_eq!(report.misses, 1);
        assert!((report.miss_rate - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_report_serializes() {
        let metrics = LookupMetrics::new();
        metrics.record_lookup();
        let json = serde_json::to_string(&metrics.report()).expect("serialize");
        assert!(json.contains("\"lookups\":1"));
        assert!(json.contains("\"miss_rate\""));
    }
}
