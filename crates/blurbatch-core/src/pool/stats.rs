//! Counters shared by scanners and workers.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Live counters updated by pool threads.
#[derive(Debug, Default)]
pub struct PoolCounters {
    enqueued: AtomicU64,
    unchanged: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    retried: AtomicU64,
    scan_passes: AtomicU64,
}

impl PoolCounters {
    pub(crate) fn record_enqueued(&self) {
        self.enqueued.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_unchanged(&self) {
        self.unchanged.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_success(&self) {
        self.succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_retry(&self) {
        self.retried.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_pass(&self) {
        self.scan_passes.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of the counters.
    pub fn snapshot(&self, elapsed: Duration) -> ProcessingStats {
        let succeeded = self.succeeded.load(Ordering::Relaxed);
        let failed = self.failed.load(Ordering::Relaxed);
        let total_seconds = elapsed.as_secs_f64();
        let images_per_second = if total_seconds > 0.0 {
            (succeeded + failed) as f64 / total_seconds
        } else {
            0.0
        };
        ProcessingStats {
            enqueued: self.enqueued.load(Ordering::Relaxed),
            skipped_unchanged: self.unchanged.load(Ordering::Relaxed),
            succeeded,
            failed,
            retried: self.retried.load(Ordering::Relaxed),
            scan_passes: self.scan_passes.load(Ordering::Relaxed),
            images_per_second,
            total_seconds,
        }
    }
}

/// Summary statistics for a pool run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingStats {
    /// Tasks pushed onto the queue
    pub enqueued: u64,

    /// Files passed over because their content was already enqueued
    pub skipped_unchanged: u64,

    /// Images blurred and written
    pub succeeded: u64,

    /// Tasks that ended in an error
    pub failed: u64,

    /// Retry attempts made
    pub retried: u64,

    /// Completed directory passes, summed over all scanners
    pub scan_passes: u64,

    /// Processing rate in images per second
    pub images_per_second: f64,

    /// Wall-clock time since the pool started, in seconds
    pub total_seconds: f64,
}
