//! Progress notifications emitted by the service.

use std::fmt;

/// State transitions of arrivals and the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceEvent {
    /// Arrival took a place in the waiting room
    Waiting { customer: String },
    /// Generator produced its last arrival and closed the room
    DoorsClosed { arrivals: u64 },
    /// Server has nothing to do
    Idle { server: String },
    /// Server started on an arrival
    Started { server: String, customer: String },
    /// Server finished an arrival
    Finished { server: String, customer: String },
    /// Server reached its terminal state
    ShopClosed { server: String, served: u64 },
    /// Server stopped because the run was cancelled
    Cancelled { server: String, served: u64 },
}

impl fmt::Display for ServiceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceEvent::Waiting { customer } => write!(f, "{} is waiting", customer),
            ServiceEvent::DoorsClosed { arrivals } => write!(f, "No more arrivals after {}", arrivals),
            ServiceEvent::Idle { server } => write!(f, "{} is sleeping", server),
            ServiceEvent::Started { customer, .. } => write!(f, "Cutting hair of {}", customer),
            ServiceEvent::Finished { customer, .. } => write!(f, "Finished cutting hair of {}", customer),
            ServiceEvent::ShopClosed { server, served } => {
                write!(f, "{} closed the shop after {} customers", server, served)
            }
            ServiceEvent::Cancelled { server, served } => {
                write!(f, "{} stopped early after {} customers", server, served)
            }
        }
    }
}
