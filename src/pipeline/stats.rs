//! Shared pipeline counters.
//!
//! Every counter is an atomic so the producer and any number of consumers can
//! update them without a lock.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Live counters shared by all pipeline activities
#[derive(Debug, Default)]
pub struct PipelineStats {
    produced: AtomicU64,
    failed: AtomicU64,
    delivered: AtomicU64,
    dropped: AtomicU64,
    consumed: AtomicU64,
    produced_at_signal: AtomicU64,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineCounts {
    pub produced: u64,
    pub failed: u64,
    pub delivered: u64,
    pub dropped: u64,
    pub consumed: u64,
    pub produced_at_signal: u64,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a generated item, returning the new total
    pub fn record_produced(&self) -> u64 {
        self.produced.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Count a failed item, returning the new failure total
    pub fn record_failed(&self) -> u64 {
        self.failed.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn record_delivered(&self) {
        self.delivered.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_consumed(&self) {
        self.consumed.fetch_add(1, Ordering::SeqCst);
    }

    /// Remember how many items existed when production stopped
    pub fn freeze_produced(&self) {
        let produced = self.produced.load(Ordering::SeqCst);
        self.produced_at_signal.store(produced, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> PipelineCounts {
        PipelineCounts {
            produced: self.produced.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
            delivered: self.delivered.load(Ordering::SeqCst),
            dropped: self.dropped.load(Ordering::SeqCst),
            consumed: self.consumed.load(Ordering::SeqCst),
            produced_at_signal: self.produced_at_signal.load(Ordering::SeqCst),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_record_returns_running_totals() {
        let stats = PipelineStats::new();
        assert_eq!(stats.record_produced(), 1);
        assert_eq!(stats.record_produced(), 2);
        assert_eq!(stats.record_failed(), 1);
    }

    #[test]
    fn test_freeze_captures_produced() {
        let stats = PipelineStats::new();
        stats.record_produced();
        stats.record_produced();
        stats.freeze_produced();
        stats.record_produced();

        let counts = stats.snapshot();
        assert_eq!(counts.produced, 3);
        assert_eq!(counts.produced_at_signal, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_increments_are_not_lost() {
        let stats = Arc::new(PipelineStats::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let stats = Arc::clone(&stats);
                tokio::spawn(async move {
                    for _ in 0..1000 {
                        stats.record_consumed();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(stats.snapshot().consumed, 8000);
    }
}
