//! The single server and its state machine.

use std::fmt;

use serde::Serialize;
use tokio::sync::mpsc;

use crate::config::ServiceConfig;
use crate::coordination::{ControlSignal, Countdown};
use crate::error::{CoordError, Result};
use crate::events::EventSink;
use crate::service::{Arrival, ServiceEvent};

/// Server lifecycle: `Idle -> Serving -> Idle -> ... -> Closed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerState {
    /// Waiting for the next arrival
    Idle,
    /// Working on an arrival
    Serving,
    /// Terminal; no further arrivals possible
    Closed,
}

impl ServerState {
    /// Whether `self -> next` is a legal step
    pub fn can_transition_to(self, next: ServerState) -> bool {
        matches!(
            (self, next),
            (ServerState::Idle, ServerState::Serving)
                | (ServerState::Serving, ServerState::Idle)
                | (ServerState::Serving, ServerState::Closed)
                | (ServerState::Idle, ServerState::Closed)
        )
    }

    /// Move to `next`, rejecting illegal steps
    pub fn transition(self, next: ServerState) -> Result<ServerState> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CoordError::InvalidState(format!("server cannot go from {} to {}", self, next)))
        }
    }

    pub fn is_terminal(self) -> bool {
        self == ServerState::Closed
    }
}

impl fmt::Display for ServerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerState::Idle => write!(f, "idle"),
            ServerState::Serving => write!(f, "serving"),
            ServerState::Closed => write!(f, "closed"),
        }
    }
}

/// What the server reports when it stops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServerOutcome {
    pub served: u64,
    pub state: ServerState,
    pub cancelled: bool,
}

/// Drains the waiting room one arrival at a time
pub struct Server {
    config: ServiceConfig,
    room: mpsc::Receiver<Arrival>,
    outstanding: Countdown,
    signal: ControlSignal,
    events: EventSink<ServiceEvent>,
    state: ServerState,
    served: u64,
}

impl Server {
    pub fn new(
        config: ServiceConfig,
        room: mpsc::Receiver<Arrival>,
        outstanding: Countdown,
        signal: ControlSignal,
        events: EventSink<ServiceEvent>,
    ) -> Self {
        Self {
            config,
            room,
            outstanding,
            signal,
            events,
            state: ServerState::Idle,
            served: 0,
        }
    }

    /// Serve arrivals until the room is closed and empty, or the run is cancelled
    pub async fn serve(mut self) -> Result<ServerOutcome> {
        loop {
            self.events.emit(ServiceEvent::Idle {
                server: self.config.server_name.clone(),
            });

            let arrival = match self.signal.guard(self.room.recv()).await {
                Some(Some(arrival)) => arrival,
                Some(None) => return self.close(false),
                None => return self.close(true),
            };

            self.state = self.state.transition(ServerState::Serving)?;
            self.events.emit(ServiceEvent::Started {
                server: self.config.server_name.clone(),
                customer: arrival.name.clone(),
            });

            if !self.signal.sleep(self.config.service_time()).await {
                return self.close(true);
            }

            self.served += 1;
            self.events.emit(ServiceEvent::Finished {
                server: self.config.server_name.clone(),
                customer: arrival.name,
            });
            let remaining = self.outstanding.count_down();
            tracing::debug!(served = self.served, remaining, "Arrival served");

            if remaining == 0 && self.room.is_closed() && self.room.is_empty() {
                return self.close(false);
            }
            self.state = self.state.transition(ServerState::Idle)?;
        }
    }

    /// Enter the terminal state
    fn close(&mut self, cancelled: bool) -> Result<ServerOutcome> {
        self.state = self.state.transition(ServerState::Closed)?;
        let server = self.config.server_name.clone();
        if cancelled {
            tracing::info!(served = self.served, "Server cancelled");
            self.events.emit(ServiceEvent::Cancelled {
                server,
                served: self.served,
            });
        } else {
            tracing::info!(served = self.served, "Shop closed");
            self.events.emit(ServiceEvent::ShopClosed {
                server,
                served: self.served,
            });
        }
        Ok(ServerOutcome {
            served: self.served,
            state: self.state,
            cancelled,
        })
    }
}
