//! Metrics hooks for filter operations
//!
//! ## Usage
//!
//! ```ignore
//! use bitmap_bloom::metrics::Metrics;
//! use std::sync::Arc;
//!
//! let metrics = Arc::new(Metrics::new());
//! let filter = MembershipFilter::new(config, store)?.with_metrics(metrics.clone());
//!
//! filter.set("bloom:users", "alice").await?;
//! assert_eq!(metrics.snapshot().sets_performed, 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;

/// Metrics collector for filter operations
///
/// Thread-safe counters; never influences results.
#[derive(Default)]
pub struct Metrics {
    /// Successful exist calls
    pub exists_performed: AtomicU64,
    /// Exist calls that answered `true`
    pub exists_positive: AtomicU64,
    /// Successful set calls
    pub sets_performed: AtomicU64,
    /// Calls that ended in an error
    pub failures: AtomicU64,
    /// Cumulative exist time in nanoseconds
    pub exist_time_ns: AtomicU64,
    /// Cumulative set time in nanoseconds
    pub set_time_ns: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_exist(&self, duration: Duration, found: bool) {
        self.exists_performed.fetch_add(1, Ordering::Relaxed);
        self.exist_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
        if found {
            self.exists_positive.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_set(&self, duration: Duration) {
        self.sets_performed.fetch_add(1, Ordering::Relaxed);
        self.set_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            exists_performed: self.exists_performed.load(Ordering::Relaxed),
            exists_positive: self.exists_positive.load(Ordering::Relaxed),
            sets_performed: self.sets_performed.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            avg_exist_ns: average(&self.exist_time_ns, &self.exists_performed),
            avg_set_ns: average(&self.set_time_ns, &self.sets_performed),
        }
    }

    /// Ratio of positive exist answers to all exist answers
    ///
    /// Includes true positives as well as false positives.
    pub fn observed_positive_rate(&self) -> f64 {
        let total = self.exists_performed.load(Ordering::Relaxed);
        let positive = self.exists_positive.load(Ordering::Relaxed);
        if total > 0 {
            positive as f64 / total as f64
        } else {
            0.0
        }
    }

    pub fn reset(&self) {
        self.exists_performed.store(0, Ordering::Relaxed);
        self.exists_positive.store(0, Ordering::Relaxed);
        self.sets_performed.store(0, Ordering::Relaxed);
        self.failures.store(0, Ordering::Relaxed);
        self.exist_time_ns.store(0, Ordering::Relaxed);
        self.set_time_ns.store(0, Ordering::Relaxed);
    }
}

fn average(total_ns: &AtomicU64, count: &AtomicU64) -> u64 {
    let total = total_ns.load(Ordering::Relaxed);
    let count = count.load(Ordering::Relaxed);
    if count > 0 {
        total / count
    } else {
        0
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, Serialize)]
pub struct MetricsSnapshot {
    pub exists_performed: u64,
    pub exists_positive: u64,
    pub sets_performed: u64,
    pub failures: u64,
    pub avg_exist_ns: u64,
    pub avg_set_ns: u64,
}

/// Trait for custom metrics recording implementations
///
/// Implement this to forward into Prometheus, StatsD or OpenTelemetry.
pub trait MetricsRecorder: Send + Sync {
    fn record_exist(&self, duration: Duration, found: bool);

    fn record_set(&self, duration: Duration);

    fn record_failure(&self);
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_exist(&self, _: Duration, _: bool) {}
    fn record_set(&self, _: Duration) {}
    fn record_failure(&self) {}
}

impl MetricsRecorder for Metrics {
    fn record_exist(&self, duration: Duration, found: bool) {
        Metrics::record_exist(self, duration, found);
    }

    fn record_set(&self, duration: Duration) {
        Metrics::record_set(self, duration);
    }

    fn record_failure(&self) {
        Metrics::record_failure(self);
    }
}
