//! Bounded service coordinator.
//!
//! A single server drains a waiting room of fixed capacity. Arrivals block
//! when the room is full (backpressure, never dropped). The server idles
//! while the room is empty, serves one arrival at a time, and closes once the
//! room is closed and nothing is left to serve.

mod arrival;
mod coordinator;
mod event;
mod server;

pub use arrival::{Arrival, ArrivalGenerator};
pub use coordinator::{ServiceCoordinator, ServiceReport};
pub use event::ServiceEvent;
pub use server::{Server, ServerOutcome, ServerState};
