//! Arrivals and the activity that generates them.

use serde::Serialize;
use tokio::sync::mpsc;

use crate::config::ServiceConfig;
use crate::coordination::{ControlSignal, Draw};
use crate::events::EventSink;
use crate::service::ServiceEvent;

/// Someone waiting to be served, numbered in arrival order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Arrival {
    pub id: u64,
    pub name: String,
}

impl Arrival {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            name: format!("customer_{}", id),
        }
    }
}

/// Produces a fixed number of arrivals, then closes the waiting room
pub struct ArrivalGenerator<D: Draw> {
    config: ServiceConfig,
    draw: D,
    room: mpsc::Sender<Arrival>,
    signal: ControlSignal,
    events: EventSink<ServiceEvent>,
}

impl<D: Draw> ArrivalGenerator<D> {
    pub fn new(
        config: ServiceConfig,
        draw: D,
        room: mpsc::Sender<Arrival>,
        signal: ControlSignal,
        events: EventSink<ServiceEvent>,
    ) -> Self {
        Self {
            config,
            draw,
            room,
            signal,
            events,
        }
    }

    /// Generate every expected arrival, blocking while the room is full
    ///
    /// Returns how many arrivals entered the room. The room closes when the
    /// generator is dropped at the end of this call.
    pub async fn arrive(mut self) -> u64 {
        let mut placed = 0;
        for id in 1..=self.config.expected_total as u64 {
            let units = self.draw.draw(self.config.arrival_range);
            if !self.signal.sleep(self.config.arrival_gap(units)).await {
                break;
            }

            let arrival = Arrival::new(id);
            let name = arrival.name.clone();
            match self.signal.guard(self.room.send(arrival)).await {
                Some(Ok(())) => {
                    placed += 1;
                    self.events.emit(ServiceEvent::Waiting { customer: name });
                }
                // Cancelled while blocked, or the server is gone
                Some(Err(_)) | None => break,
            }
        }

        tracing::debug!(placed, "Arrival generation finished");
        self.events.emit(ServiceEvent::DoorsClosed { arrivals: placed });
        placed
    }
}
