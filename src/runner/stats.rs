//! Per-cycle counters
//!
//! Counters are bumped by the walker and the detail workers as tasks finish,
//! and snapshotted into a [`CycleStats`] once the cycle barrier has passed.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Summary of one cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleStats {
    /// Category tasks whose extraction completed
    pub categories_processed: usize,

    /// Category tasks dropped after a failure
    pub categories_failed: usize,

    /// Detail tasks handed to storage successfully
    pub details_saved: usize,

    /// Detail tasks dropped after a failure
    pub details_failed: usize,

    /// Detail workers admitted during the cycle
    pub workers_spawned: usize,

    pub elapsed: Duration,
}

impl fmt::Display for CycleStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "categories {} ok / {} failed, details {} saved / {} failed, {} workers in {:.2?}",
            self.categories_processed,
            self.categories_failed,
            self.details_saved,
            self.details_failed,
            self.workers_spawned,
            self.elapsed
        )
    }
}

#[derive(Debug, Default)]
pub(crate) struct CycleCounters {
    pub categories_processed: AtomicUsize,
    pub categories_failed: AtomicUsize,
    pub details_saved: AtomicUsize,
    pub details_failed: AtomicUsize,
    pub workers_spawned: AtomicUsize,
}

impl CycleCounters {
    pub fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn reset(&self) {
        for counter in self.all() {
            counter.store(0, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self, elapsed: Duration) -> CycleStats {
        CycleStats {
            categories_processed: self.categories_processed.load(Ordering::Relaxed),
            categories_failed: self.categories_failed.load(Ordering::Relaxed),
            details_saved: self.details_saved.load(Ordering::Relaxed),
            details_failed: self.details_failed.load(Ordering::Relaxed),
            workers_spawned: self.workers_spawned.load(Ordering::Relaxed),
            elapsed,
        }
    }

    fn all(&self) -> [&AtomicUsize; 5] {
        [
            &self.categories_processed,
            &self.categories_failed,
            &self.details_saved,
            &self.details_failed,
            &self.workers_spawned,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_and_reset() {
        let counters = CycleCounters::default();
        CycleCounters::bump(&counters.details_saved);
        CycleCounters::bump(&counters.details_saved);
        CycleCounters::bump(&counters.categories_failed);

        let stats = counters.snapshot(Duration::from_millis(5));
        assert_eq!(stats.details_saved, 2);
        assert_eq!(stats.categories_failed, 1);
        assert_eq!(stats.elapsed, Duration::from_millis(5));

        counters.reset();
        assert_eq!(counters.snapshot(Duration::ZERO), CycleStats::default());
    }

    #[test]
    fn test_display() {
        let stats = CycleStats {
            categories_processed: 1,
            details_saved: 2,
            workers_spawned: 1,
            ..Default::default()
        };
        let text = stats.to_string();
        assert!(text.starts_with("categories 1 ok / 0 failed, details 2 saved / 0 failed, 1 workers"));
    }
}
