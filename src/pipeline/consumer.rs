//! Consuming activities.
//!
//! Consumers share one receiver behind an async mutex. Each waits on a
//! blocking receive; a separate select branch notices the shutdown signal and
//! flips the consumer into drain mode. Receives keep going until the conduit
//! is both closed and empty, so nothing already handed off is lost. The
//! cancellation token ends a consumer at once, mid-processing or mid-drain.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, mpsc};

use crate::config::PipelineConfig;
use crate::events::EventSink;
use crate::pipeline::{PipelineControl, PipelineEvent, PipelineStats, WorkItem};

/// Receiver shared by every consumer
pub type SharedConduit = Arc<Mutex<mpsc::Receiver<WorkItem>>>;

/// What a consumer reports when it exits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConsumerOutcome {
    pub consumer: usize,
    pub consumed: u64,
    /// Items processed after the shutdown signal fired
    pub drained: u64,
    /// Stopped by the cancellation token rather than an empty, closed conduit
    pub cancelled: bool,
}

pub struct Consumer {
    id: usize,
    config: PipelineConfig,
    conduit: SharedConduit,
    stats: Arc<PipelineStats>,
    control: PipelineControl,
    events: EventSink<PipelineEvent>,
}

impl Consumer {
    pub fn new(
        id: usize,
        config: PipelineConfig,
        conduit: SharedConduit,
        stats: Arc<PipelineStats>,
        control: PipelineControl,
        events: EventSink<PipelineEvent>,
    ) -> Self {
        Self {
            id,
            config,
            conduit,
            stats,
            control,
            events,
        }
    }

    /// Take and process items until the conduit is closed and empty
    ///
    /// Returns early when the run is cancelled; an item taken but not yet
    /// processed at that point is not counted.
    pub async fn consume(self) -> ConsumerOutcome {
        let mut consumed = 0;
        let mut drained = 0;
        let mut draining = false;
        let mut cancelled = false;

        loop {
            let next = tokio::select! {
                biased;
                _ = self.control.cancel.triggered() => {
                    cancelled = true;
                    break;
                }
                _ = self.control.shutdown.triggered(), if !draining => {
                    draining = true;
                    self.events.emit(PipelineEvent::Draining { consumer: self.id });
                    continue;
                }
                item = take(&self.conduit) => item,
            };
            let Some(item) = next else {
                break;
            };

            self.events.emit(PipelineEvent::Taken {
                consumer: self.id,
                id: item.id,
            });
            if !self.control.cancel.sleep(self.config.processing_time(item.cost)).await {
                cancelled = true;
                break;
            }
            self.stats.record_consumed();
            consumed += 1;
            if draining {
                drained += 1;
            }
            self.events.emit(PipelineEvent::Processed {
                consumer: self.id,
                id: item.id,
            });
        }

        tracing::debug!(consumer = self.id, consumed, drained, cancelled, "Consumer exiting");
        self.events.emit(PipelineEvent::ConsumerDone {
            consumer: self.id,
            consumed,
        });
        ConsumerOutcome {
            consumer: self.id,
            consumed,
            drained,
            cancelled,
        }
    }
}

/// Wait for the next item; None once the conduit is closed and empty
async fn take(conduit: &SharedConduit) -> Option<WorkItem> {
    conduit.lock().await.recv().await
}
