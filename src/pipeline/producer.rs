//! The single producing activity.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::config::PipelineConfig;
use crate::coordination::Draw;
use crate::events::EventSink;
use crate::pipeline::{PipelineControl, PipelineEvent, PipelineStats, WorkItem};

/// Why production stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProducerExit {
    /// Failure count exceeded the threshold
    FailureThreshold { failed: u64 },
    /// Cancellation token was triggered from outside
    Cancelled,
}

/// Generates work items and hands them to the conduit
pub struct Producer<D: Draw> {
    config: PipelineConfig,
    draw: D,
    tx: mpsc::Sender<WorkItem>,
    stats: Arc<PipelineStats>,
    control: PipelineControl,
    events: EventSink<PipelineEvent>,
    next_id: u64,
}

impl<D: Draw> Producer<D> {
    pub fn new(
        config: PipelineConfig,
        draw: D,
        tx: mpsc::Sender<WorkItem>,
        stats: Arc<PipelineStats>,
        control: PipelineControl,
        events: EventSink<PipelineEvent>,
    ) -> Self {
        Self {
            config,
            draw,
            tx,
            stats,
            control,
            events,
            next_id: 1,
        }
    }

    /// Produce until the failure threshold is crossed or the run is cancelled
    ///
    /// Consumes the producer; dropping its sender closes the conduit.
    pub async fn produce(mut self) -> ProducerExit {
        let exit = loop {
            let Some(item) = self.generate().await else {
                break ProducerExit::Cancelled;
            };
            // An item finished after cancellation is discarded uncounted
            if self.control.cancel.is_triggered() {
                break ProducerExit::Cancelled;
            }
            let produced = self.stats.record_produced();
            tracing::debug!(id = item.id, cost = item.cost, produced, "Item generated");

            if item.failed {
                let failed = self.stats.record_failed();
                self.events.emit(PipelineEvent::Failed { id: item.id, failed });
                if failed > u64::from(self.config.failure_threshold) {
                    break ProducerExit::FailureThreshold { failed };
                }
                continue;
            }

            let id = item.id;
            match self.tx.try_send(item) {
                Ok(()) => {
                    self.stats.record_delivered();
                    self.events.emit(PipelineEvent::Pushed { id });
                }
                Err(TrySendError::Full(item)) => {
                    self.stats.record_dropped();
                    self.events.emit(PipelineEvent::Dropped { id: item.id });
                }
                Err(TrySendError::Closed(_)) => break ProducerExit::Cancelled,
            }
        };

        self.stats.freeze_produced();
        self.control.shutdown.trigger();

        let counts = self.stats.snapshot();
        match exit {
            ProducerExit::FailureThreshold { failed } => {
                tracing::warn!(produced = counts.produced, failed, "Failure threshold exceeded");
                self.events.emit(PipelineEvent::Shutdown {
                    produced: counts.produced,
                    failed,
                });
            }
            ProducerExit::Cancelled => {
                tracing::info!(produced = counts.produced, "Production cancelled");
                self.events.emit(PipelineEvent::Cancelled {
                    produced: counts.produced,
                });
            }
        }
        exit
    }

    /// Draw a cost, wait out the generation delay, and build the item
    ///
    /// Returns None when the run is cancelled first.
    async fn generate(&mut self) -> Option<WorkItem> {
        if self.control.cancel.is_triggered() {
            return None;
        }
        let cost = self.draw.draw(self.config.draw_range);
        if !self.control.cancel.sleep(self.config.generation_delay(cost)).await {
            return None;
        }
        let item = WorkItem::new(self.next_id, cost, self.config.failure_cutoff);
        self.next_id += 1;
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordination::{ControlSignal, Scripted};
    use crate::events::drain;
    use std::time::Duration;

    /// Draws cost 0 and triggers the cancel token on the given draw
    struct CancelOnDraw {
        cancel: ControlSignal,
        draws_left: u32,
    }

    impl Draw for CancelOnDraw {
        fn draw(&mut self, _upper: u32) -> u32 {
            self.draws_left = self.draws_left.saturating_sub(1);
            if self.draws_left == 0 {
                self.cancel.trigger();
            }
            0
        }
    }

    fn fast_config(threshold: u32) -> PipelineConfig {
        PipelineConfig::default()
            .with_failure_threshold(threshold)
            .with_timings(0, 0)
    }

    #[tokio::test]
    async fn test_stops_right_after_threshold_exceeded() {
        let (tx, mut rx) = mpsc::channel(16);
        let stats = Arc::new(PipelineStats::new());
        let control = PipelineControl::default();
        let draws = Scripted::new([1, 4, 0, 4, 2, 4, 1, 1]);
        let producer = Producer::new(fast_config(2), draws, tx, Arc::clone(&stats), control.clone(), EventSink::silent());

        let exit = producer.produce().await;

        assert_eq!(exit, ProducerExit::FailureThreshold { failed: 3 });
        assert!(control.shutdown.is_triggered());
        assert!(!control.cancel.is_triggered());
        let counts = stats.snapshot();
        assert_eq!(counts.produced, 6);
        assert_eq!(counts.failed, 3);
        assert_eq!(counts.delivered, 3);
        assert_eq!(counts.produced_at_signal, 6);

        // Only healthy items reach the conduit, and it is closed afterwards
        let mut received = Vec::new();
        while let Some(item) = rx.recv().await {
            received.push(item.id);
        }
        assert_eq!(received, vec![1, 3, 5]);
    }

    #[tokio::test]
    async fn test_zero_threshold_stops_on_first_failure() {
        let (tx, _rx) = mpsc::channel(16);
        let stats = Arc::new(PipelineStats::new());
        let draws = Scripted::new([0, 0, 4]);
        let producer = Producer::new(fast_config(0), draws, tx, Arc::clone(&stats), PipelineControl::default(), EventSink::silent());

        assert_eq!(producer.produce().await, ProducerExit::FailureThreshold { failed: 1 });
        assert_eq!(stats.snapshot().produced, 3);
    }

    #[tokio::test]
    async fn test_full_conduit_drops_items() {
        let (tx, _rx) = mpsc::channel(2);
        let stats = Arc::new(PipelineStats::new());
        let (events, mut events_rx) = EventSink::channel();
        let draws = Scripted::new([0, 0, 0, 0, 4]);
        let producer = Producer::new(fast_config(0), draws, tx, Arc::clone(&stats), PipelineControl::default(), events);

        producer.produce().await;

        let counts = stats.snapshot();
        assert_eq!(counts.delivered, 2);
        assert_eq!(counts.dropped, 2);
        let dropped: Vec<u64> = drain(&mut events_rx)
            .into_iter()
            .filter_map(|e| match e {
                PipelineEvent::Dropped { id } => Some(id),
                _ => None,
            })
            .collect();
        assert_eq!(dropped, vec![3, 4]);
    }

    #[tokio::test]
    async fn test_external_cancel_freezes_production() {
        let (tx, _rx) = mpsc::channel(1000);
        let stats = Arc::new(PipelineStats::new());
        let control = PipelineControl::default();
        let config = PipelineConfig::default().with_timings(1, 0);
        let producer = Producer::new(config, Scripted::new([]).then(1), tx, Arc::clone(&stats), control.clone(), EventSink::silent());

        let handle = tokio::spawn(producer.produce());
        tokio::time::sleep(Duration::from_millis(20)).await;
        control.cancel.trigger();

        let exit = tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("producer should stop")
            .unwrap();
        assert_eq!(exit, ProducerExit::Cancelled);

        let counts = stats.snapshot();
        assert_eq!(counts.produced, counts.produced_at_signal);
        assert_eq!(counts.failed, 0);
        assert!(control.shutdown.is_triggered());
    }

    #[tokio::test]
    async fn test_item_in_flight_at_cancel_is_not_counted() {
        let (tx, mut rx) = mpsc::channel(16);
        let stats = Arc::new(PipelineStats::new());
        let control = PipelineControl::default();
        let draws = CancelOnDraw {
            cancel: control.cancel.clone(),
            draws_left: 3,
        };
        let producer = Producer::new(fast_config(2), draws, tx, Arc::clone(&stats), control, EventSink::silent());

        assert_eq!(producer.produce().await, ProducerExit::Cancelled);

        let counts = stats.snapshot();
        assert_eq!(counts.produced, 2);
        assert_eq!(counts.produced_at_signal, 2);
        let mut received = Vec::new();
        while let Some(item) = rx.recv().await {
            received.push(item.id);
        }
        assert_eq!(received, vec![1, 2]);
    }
}
