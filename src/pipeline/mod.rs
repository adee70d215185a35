//! Bounded pipeline coordinator.
//!
//! One producer feeds a pool of consumers through a fixed-capacity conduit.
//! Handoff is best effort: when the conduit is full the item is dropped rather
//! than queued. Failed items are counted, and once the count exceeds the
//! configured threshold the producer triggers the shutdown signal and closes
//! the conduit. Consumers then drain what is left and exit. A separate
//! cancellation token stops every activity early, drain included.

mod consumer;
mod control;
mod coordinator;
mod event;
mod item;
mod producer;
mod stats;

pub use consumer::{Consumer, ConsumerOutcome, SharedConduit};
pub use control::PipelineControl;
pub use coordinator::{PipelineCoordinator, PipelineReport};
pub use event::PipelineEvent;
pub use item::WorkItem;
pub use producer::{Producer, ProducerExit};
pub use stats::{PipelineCounts, PipelineStats};
