//! Progress notifications emitted by the pipeline.

use std::fmt;

/// State transitions of the producer and consumers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// Item placed in the conduit
    Pushed { id: u64 },
    /// Conduit full, item discarded
    Dropped { id: u64 },
    /// Generated item was flagged failed
    Failed { id: u64, failed: u64 },
    /// Failure count crossed the threshold; production stopped
    Shutdown { produced: u64, failed: u64 },
    /// Production stopped because the run was cancelled
    Cancelled { produced: u64 },
    /// Consumer took an item from the conduit
    Taken { consumer: usize, id: u64 },
    /// Consumer finished processing an item
    Processed { consumer: usize, id: u64 },
    /// Consumer saw the control signal and is draining
    Draining { consumer: usize },
    /// Conduit closed and empty; consumer exited
    ConsumerDone { consumer: usize, consumed: u64 },
}

impl fmt::Display for PipelineEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineEvent::Pushed { id } => write!(f, "Generated and pushed item #{}", id),
            PipelineEvent::Dropped { id } => write!(f, "Conduit full, dropped item #{}", id),
            PipelineEvent::Failed { id, failed } => write!(f, "Item #{} failed ({} failures so far)", id, failed),
            PipelineEvent::Shutdown { produced, failed } => write!(
                f,
                "Terminating generation: {} items produced, {} failed",
                produced, failed
            ),
            PipelineEvent::Cancelled { produced } => {
                write!(f, "Generation cancelled after {} items", produced)
            }
            PipelineEvent::Taken { consumer, id } => write!(f, "Consumer {} consuming item #{}", consumer, id),
            PipelineEvent::Processed { consumer, id } => write!(f, "Consumer {} consumed item #{}", consumer, id),
            PipelineEvent::Draining { consumer } => write!(f, "Consumer {} draining remaining items", consumer),
            PipelineEvent::ConsumerDone { consumer, consumed } => {
                write!(f, "Consumer {} done, total items consumed: {}", consumer, consumed)
            }
        }
    }
}
