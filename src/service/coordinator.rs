//! Runs the arrival generator and the server until every arrival is served.

use rand::rngs::StdRng;
use serde::Serialize;
use tokio::sync::mpsc;

use crate::config::ServiceConfig;
use crate::coordination::{ControlSignal, Countdown, Draw, rng_from_seed};
use crate::error::Result;
use crate::events::EventSink;
use crate::service::{ArrivalGenerator, Server, ServerState, ServiceEvent};

/// Result of a service run
#[derive(Debug, Clone, Serialize)]
pub struct ServiceReport {
    pub server: String,
    pub expected: usize,
    pub arrivals: u64,
    pub served: u64,
    pub final_state: ServerState,
    pub cancelled: bool,
}

/// Coordinates a single server over a bounded waiting room
pub struct ServiceCoordinator<D: Draw = StdRng> {
    config: ServiceConfig,
    draw: D,
    signal: ControlSignal,
    events: EventSink<ServiceEvent>,
}

impl ServiceCoordinator<StdRng> {
    /// Create a coordinator drawing arrival gaps from the configured RNG
    pub fn new(config: ServiceConfig) -> Result<Self> {
        config.validate()?;
        let draw = rng_from_seed(config.seed);
        Ok(Self {
            config,
            draw,
            signal: ControlSignal::new(),
            events: EventSink::silent(),
        })
    }
}

impl<D: Draw> ServiceCoordinator<D> {
    /// Replace the source of arrival gaps
    pub fn with_draw<E: Draw>(self, draw: E) -> ServiceCoordinator<E> {
        ServiceCoordinator {
            config: self.config,
            draw,
            signal: self.signal,
            events: self.events,
        }
    }

    /// Use an externally owned cancellation signal
    pub fn with_signal(mut self, signal: ControlSignal) -> Self {
        self.signal = signal;
        self
    }

    pub fn with_events(mut self, events: EventSink<ServiceEvent>) -> Self {
        self.events = events;
        self
    }

    /// Signal that cancels this run
    pub fn signal(&self) -> ControlSignal {
        self.signal.clone()
    }

    /// Serve the expected number of arrivals, then wait for the shop to close
    pub async fn run(self) -> Result<ServiceReport> {
        let expected = self.config.expected_total;
        let (room_tx, room_rx) = mpsc::channel(self.config.waiting_capacity);
        let outstanding = Countdown::new(expected);

        tracing::info!(
            server = %self.config.server_name,
            waiting_capacity = self.config.waiting_capacity,
            expected,
            "Opening bounded service"
        );

        let generator = ArrivalGenerator::new(
            self.config.clone(),
            self.draw,
            room_tx,
            self.signal.clone(),
            self.events.clone(),
        );
        let generator = tokio::spawn(generator.arrive());

        let server = Server::new(
            self.config.clone(),
            room_rx,
            outstanding.clone(),
            self.signal.clone(),
            self.events.clone(),
        );
        let server = tokio::spawn(server.serve());

        // Completion is the countdown reaching zero, not the server's own state
        tokio::select! {
            _ = outstanding.wait() => {}
            _ = self.signal.triggered() => {}
        }

        let arrivals = generator.await?;
        let outcome = server.await??;

        tracing::info!(served = outcome.served, cancelled = outcome.cancelled, "Bounded service finished");

        Ok(ServiceReport {
            server: self.config.server_name,
            expected,
            arrivals,
            served: outcome.served,
            final_state: outcome.state,
            cancelled: outcome.cancelled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordination::Scripted;
    use crate::events::drain;
    use std::time::Duration;

    fn fast_config(total: usize) -> ServiceConfig {
        ServiceConfig::default()
            .with_expected_total(total)
            .with_timings(1, 2)
    }

    #[test]
    fn test_new_rejects_zero_capacity() {
        let config = ServiceConfig::default().with_waiting_capacity(0);
        assert!(ServiceCoordinator::new(config).is_err());
    }

    #[tokio::test]
    async fn test_serves_expected_total() {
        let report = ServiceCoordinator::new(fast_config(10).with_seed(3))
            .unwrap()
            .run()
            .await
            .unwrap();

        assert_eq!(report.served, 10);
        assert_eq!(report.arrivals, 10);
        assert_eq!(report.final_state, ServerState::Closed);
        assert!(!report.cancelled);
    }

    #[tokio::test]
    async fn test_burst_larger_than_room_is_not_dropped() {
        // All arrivals at once into a room of 2
        let config = fast_config(8).with_waiting_capacity(2);
        let report = ServiceCoordinator::new(config)
            .unwrap()
            .with_draw(Scripted::new([]))
            .run()
            .await
            .unwrap();

        assert_eq!(report.served, 8);
    }

    #[tokio::test]
    async fn test_idle_reported_before_each_service() {
        let (events, mut rx) = EventSink::channel();
        ServiceCoordinator::new(fast_config(5).with_seed(9))
            .unwrap()
            .with_events(events)
            .run()
            .await
            .unwrap();

        // Arrival events interleave, so look only at what the server says
        let server_events: Vec<_> = drain(&mut rx)
            .into_iter()
            .filter(|e| !matches!(e, ServiceEvent::Waiting { .. } | ServiceEvent::DoorsClosed { .. }))
            .collect();
        let mut served = 0;
        for (i, event) in server_events.iter().enumerate() {
            if matches!(event, ServiceEvent::Started { .. }) {
                served += 1;
                assert!(matches!(server_events[i - 1], ServiceEvent::Idle { .. }));
            }
        }
        assert_eq!(served, 5);
        assert!(matches!(server_events.last(), Some(ServiceEvent::ShopClosed { served: 5, .. })));
    }

    #[tokio::test]
    async fn test_zero_expected_closes_immediately() {
        let report = ServiceCoordinator::new(fast_config(0)).unwrap().run().await.unwrap();
        assert_eq!(report.served, 0);
        assert_eq!(report.final_state, ServerState::Closed);
    }

    #[tokio::test]
    async fn test_cancel_stops_service() {
        let config = ServiceConfig::default()
            .with_expected_total(100)
            .with_timings(5, 20);
        let coordinator = ServiceCoordinator::new(config).unwrap();
        let signal = coordinator.signal();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            signal.trigger();
        });

        let report = tokio::time::timeout(Duration::from_secs(5), coordinator.run())
            .await
            .expect("cancelled service should return")
            .unwrap();
        assert!(report.cancelled);
        assert!(report.served < 100);
        assert_eq!(report.final_state, ServerState::Closed);
    }
}
