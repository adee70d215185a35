//! Resource ring coordinator.
//!
//! N agents sit in a cycle with one exclusive resource between each pair of
//! neighbours. An agent needs both of its adjacent resources to do a unit of
//! work. All agents rendezvous on a barrier before the first cycle, then each
//! runs a fixed number of acquire/use/release/idle cycles.
//!
//! Deadlock freedom comes from `ResourceRing`, which always locks the lower
//! index of a pair first.

mod agent;
mod coordinator;
mod event;
mod resource;

pub use agent::{Agent, AgentOutcome};
pub use coordinator::{RingCoordinator, RingReport, RingTable};
pub use event::RingEvent;
pub use resource::{PairGuard, ResourceRing};
