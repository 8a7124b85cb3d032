//! Metrics hooks for registry operations
//!
//! Counters for lookups, cache effectiveness, registrations, growth events and
//! persistence failures.
//!
//! ## Usage
//!
//! ```ignore
//! use username_registry::metrics::{Metrics, MetricsRecorder};
//!
//! let metrics = Metrics::new();
//! let start = std::time::Instant::now();
//! let taken = registry.contains(b"alice");
//! metrics.record_lookup(start.elapsed(), LookupSource::Registry);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;

/// Where an availability answer came from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LookupSource {
    Cache,
    Registry,
}

/// Metrics collector for registry operations
#[derive(Default)]
pub struct Metrics {
    /// Availability checks that reached a lookup
    pub lookups_performed: AtomicU64,
    /// Lookups answered from the cache
    pub cache_hits: AtomicU64,
    /// Cache reads or writes that failed
    pub cache_errors: AtomicU64,
    /// Successful registrations
    pub registrations: AtomicU64,
    /// Registrations rejected by canonicalization
    pub registrations_rejected: AtomicU64,
    /// Generations appended because the FPR target was crossed
    pub growth_events: AtomicU64,
    /// Saves that failed (registration not durable)
    pub persistence_failures: AtomicU64,
    /// Cumulative lookup time in nanoseconds
    pub lookup_time_ns: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_lookup(&self, duration: Duration, source: LookupSource) {
        self.lookups_performed.fetch_add(1, Ordering::Relaxed);
        self.lookup_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
        if source == LookupSource::Cache {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_cache_error(&self) {
        self.cache_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_registration(&self) {
        self.registrations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejection(&self) {
        self.registrations_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_growth(&self) {
        self.growth_events.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_persistence_failure(&self) {
        self.persistence_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            lookups_performed: self.lookups_performed.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_errors: self.cache_errors.load(Ordering::Relaxed),
            registrations: self.registrations.load(Ordering::Relaxed),
            registrations_rejected: self.registrations_rejected.load(Ordering::Relaxed),
            growth_events: self.growth_events.load(Ordering::Relaxed),
            persistence_failures: self.persistence_failures.load(Ordering::Relaxed),
            avg_lookup_ns: self.avg_lookup_time_ns(),
            cache_hit_rate: self.cache_hit_rate(),
        }
    }

    /// Calculate average lookup time in nanoseconds
    pub fn avg_lookup_time_ns(&self) -> u64 {
        let total = self.lookup_time_ns.load(Ordering::Relaxed);
        let count = self.lookups_performed.load(Ordering::Relaxed);
        if count > 0 {
            total / count
        } else {
            0
        }
    }

    /// Fraction of lookups served from the cache
    pub fn cache_hit_rate(&self) -> f64 {
        let total = self.lookups_performed.load(Ordering::Relaxed);
        let hits = self.cache_hits.load(Ordering::Relaxed);
        if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        }
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub lookups_performed: u64,
    pub cache_hits: u64,
    pub cache_errors: u64,
    pub registrations: u64,
    pub registrations_rejected: u64,
    pub growth_events: u64,
    pub persistence_failures: u64,
    pub avg_lookup_ns: u64,
    /// Fraction of lookups served from the cache
    pub cache_hit_rate: f64,
}

/// Trait for custom metrics recording implementations
///
/// Implement this trait to integrate with external metrics systems
/// like Prometheus, StatsD, or OpenTelemetry.
pub trait MetricsRecorder: Send + Sync {
    fn record_lookup(&self, duration: Duration, source: LookupSource);
    fn record_cache_error(&self);
    fn record_registration(&self);
    fn record_rejection(&self);
    fn record_growth(&self);
    fn record_persistence_failure(&self);
    fn snapshot(&self) -> MetricsSnapshot;
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_lookup(&self, _: Duration, _: LookupSource) {}
    fn record_cache_error(&self) {}
    fn record_registration(&self) {}
    fn record_rejection(&self) {}
    fn record_growth(&self) {}
    fn record_persistence_failure(&self) {}
    fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot::default()
    }
}

impl MetricsRecorder for Metrics {
    fn record_lookup(&self, duration: Duration, source: LookupSource) {
        Metrics::record_lookup(self, duration, source);
    }

    fn record_cache_error(&self) {
        Metrics::record_cache_error(self);
    }

    fn record_registration(&self) {
        Metrics::record_registration(self);
    }

    fn record_rejection(&self) {
        Metrics::record_rejection(self);
    }

    fn record_growth(&self) {
        Metrics::record_growth(self);
    }

    fn record_persistence_failure(&self) {
        Metrics::record_persistence_failure(self);
    }

    fn snapshot(&self) -> MetricsSnapshot {
        Metrics::snapshot(self)
    }
}
