//! Metrics for the matching core
//!
//! Lightweight atomics-based meters, recorded by the replica node and
//! exported as JSON by the HTTP surface.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Monotonic counter
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    pub fn increment(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add(&self, n: u64) {
        self.value.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Gauge for current values
#[derive(Debug, Default)]
pub struct Gauge {
    value: AtomicU64,
}

impl Gauge {
    pub fn set(&self, value: u64) {
        self.value.store(value, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Min/avg/max latency tracker in microseconds
#[derive(Debug)]
pub struct Histogram {
    count: AtomicU64,
    sum: AtomicU64,
    min: AtomicU64,
    max: AtomicU64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self {
            count: AtomicU64::new(0),
            sum: AtomicU64::new(0),
            min: AtomicU64::new(u64::MAX),
            max: AtomicU64::new(0),
        }
    }
}

impl Histogram {
    pub fn record(&self, value_us: u64) {
        self.count.fetch_add(1, Ordering::Relaxed);
        self.sum.fetch_add(value_us, Ordering::Relaxed);
        self.min.fetch_min(value_us, Ordering::Relaxed);
        self.max.fetch_max(value_us, Ordering::Relaxed);
    }

    pub fn stats(&self) -> HistogramStats {
        let count = self.count.load(Ordering::Relaxed);
        let sum = self.sum.load(Ordering::Relaxed);
        let min = self.min.load(Ordering::Relaxed);

        HistogramStats {
            count,
            avg_us: if count > 0 { sum / count } else { 0 },
            min_us: if min == u64::MAX { 0 } else { min },
            max_us: self.max.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct HistogramStats {
    pub count: u64,
    pub avg_us: u64,
    pub min_us: u64,
    pub max_us: u64,
}

/// Meters recorded around book operations
#[derive(Debug, Default)]
pub struct BookMetrics {
    pub orders_received: Counter,
    pub orders_matched: Counter,
    pub orders_rejected: Counter,
    pub trades_executed: Counter,
    pub submit_latency: Histogram,
    pub resting_depth: Gauge,
}

impl BookMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_order_received(&self) {
        self.orders_received.increment();
    }

    pub fn record_order_matched(&self) {
        self.orders_matched.increment();
    }

    pub fn record_order_rejected(&self) {
        self.orders_rejected.increment();
    }

    pub fn record_trades(&self, count: u64) {
        self.trades_executed.add(count);
    }

    pub fn record_latency(&self, elapsed: Duration) {
        self.submit_latency.record(elapsed.as_micros() as u64);
    }

    pub fn set_resting_depth(&self, depth: u64) {
        self.resting_depth.set(depth);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let latency = self.submit_latency.stats();
        MetricsSnapshot {
            orders_received: self.orders_received.get(),
            orders_matched: self.orders_matched.get(),
            orders_rejected: self.orders_rejected.get(),
            trades_executed: self.trades_executed.get(),
            submit_latency: latency,
            resting_depth: self.resting_depth.get(),
        }
    }
}

/// Point-in-time view of all meters
#[derive(Debug, Clone, serde::Serialize)]
pub struct MetricsSnapshot {
    pub orders_received: u64,
    pub orders_matched: u64,
    pub orders_rejected: u64,
    pub trades_executed: u64,
    pub submit_latency: HistogramStats,
    pub resting_depth: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_and_gauge() {
        let metrics = BookMetrics::new();
        metrics.record_order_received();
        metrics.record_order_received();
        metrics.record_trades(3);
        metrics.set_resting_depth(7);

        let snap = metrics.snapshot();
        assert_eq!(snap.orders_received, 2);
        assert_eq!(snap.trades_executed, 3);
        assert_eq!(snap.resting_depth, 7);
    }

    #[test]
    fn test_histogram_stats() {
        let histogram = Histogram::default();
        assert_eq!(histogram.stats().min_us, 0);

        histogram.record(10);
        histogram.record(30);

        let stats = histogram.stats();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.avg_us, 20);
        assert_eq!(stats.min_us, 10);
        assert_eq!(stats.max_us, 30);
    }
}
