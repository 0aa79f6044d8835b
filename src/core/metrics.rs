//! Counters for dispatcher and batching sink health
//!
//! Only admitted records touch these counters; a record suppressed by the
//! threshold leaves no trace anywhere.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for dispatcher observability
///
/// # Example
///
/// ```
/// use rust_log_dispatcher::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_delivered();
/// metrics.record_failed();
///
/// assert_eq!(metrics.delivered_count(), 1);
/// assert_eq!(metrics.failed_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct LoggerMetrics {
    /// Records every subscribed sink accepted
    delivered_count: AtomicU64,

    /// Records at least one subscribed sink failed on (error or panic)
    failed_count: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            delivered_count: AtomicU64::new(0),
            failed_count: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn delivered_count(&self) -> u64 {
        self.delivered_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn failed_count(&self) -> u64 {
        self.failed_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_delivered(&self) -> u64 {
        self.delivered_count.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_failed(&self) -> u64 {
        self.failed_count.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of admitted records with at least one failed sink (0.0 - 100.0)
    pub fn failure_rate(&self) -> f64 {
        let failed = self.failed_count() as f64;
        let total = failed + self.delivered_count() as f64;

        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }
}

/// Metrics for one batching sink's flush cycles
#[derive(Debug, Default)]
pub struct FlushMetrics {
    /// Cycles in which every recipient accepted the batch
    successful_flushes: AtomicU64,

    /// Cycles aborted by a recipient failure
    failed_flushes: AtomicU64,

    /// Buffered bytes cleared after successful cycles
    bytes_delivered: AtomicU64,
}

impl FlushMetrics {
    pub const fn new() -> Self {
        Self {
            successful_flushes: AtomicU64::new(0),
            failed_flushes: AtomicU64::new(0),
            bytes_delivered: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn successful_flushes(&self) -> u64 {
        self.successful_flushes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn failed_flushes(&self) -> u64 {
        self.failed_flushes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn bytes_delivered(&self) -> u64 {
        self.bytes_delivered.load(Ordering::Relaxed)
    }

    pub fn record_success(&self, bytes: usize) {
        self.successful_flushes.fetch_add(1, Ordering::Relaxed);
        self.bytes_delivered.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    /// Returns the number of failures recorded before this one
    pub fn record_failure(&self) -> u64 {
        self.failed_flushes.fetch_add(1, Ordering::Relaxed)
    }
}
