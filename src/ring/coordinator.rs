//! Runs a full ring of agents to completion.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Barrier;

use crate::config::RingConfig;
use crate::coordination::ControlSignal;
use crate::error::Result;
use crate::events::EventSink;
use crate::ring::{Agent, AgentOutcome, ResourceRing, RingEvent};

/// State shared by every agent of one run
#[derive(Debug)]
pub struct RingTable {
    pub(crate) resources: ResourceRing,
    barrier: Barrier,
    pub(crate) signal: ControlSignal,
    pub(crate) events: EventSink<RingEvent>,
    pub(crate) use_time: Duration,
    pub(crate) idle_time: Duration,
}

impl RingTable {
    /// Table for `size` agents with as many resources
    pub fn new(
        size: usize,
        signal: ControlSignal,
        events: EventSink<RingEvent>,
        use_time: Duration,
        idle_time: Duration,
    ) -> Self {
        Self {
            resources: ResourceRing::new(size),
            barrier: Barrier::new(size),
            signal,
            events,
            use_time,
            idle_time,
        }
    }

    /// Register an agent and wait until the whole ring has joined
    ///
    /// Returns false if the run was cancelled first.
    pub async fn join_ring(&self, agent: &Agent) -> bool {
        self.events.emit(RingEvent::Seated {
            agent: agent.name.clone(),
        });
        self.signal.guard(self.barrier.wait()).await.is_some()
    }
}

/// Result of a ring run
#[derive(Debug, Clone, Serialize)]
pub struct RingReport {
    pub agents: Vec<AgentOutcome>,
    pub total_cycles: u64,
    /// Acquisitions per resource
    pub resource_uses: Vec<u64>,
    pub exclusion_violations: u64,
    pub cancelled: bool,
}

/// Coordinates a ring of agents competing for shared resources
pub struct RingCoordinator {
    config: RingConfig,
    signal: ControlSignal,
    events: EventSink<RingEvent>,
}

impl RingCoordinator {
    /// Create a coordinator for a validated ring
    pub fn new(config: RingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            signal: ControlSignal::new(),
            events: EventSink::silent(),
        })
    }

    /// Use an externally owned cancellation signal
    pub fn with_signal(mut self, signal: ControlSignal) -> Self {
        self.signal = signal;
        self
    }

    pub fn with_events(mut self, events: EventSink<RingEvent>) -> Self {
        self.events = events;
        self
    }

    /// Signal that cancels this run
    pub fn signal(&self) -> ControlSignal {
        self.signal.clone()
    }

    /// Seat every agent, run all cycles, and wait until each agent is done
    pub async fn run(self) -> Result<RingReport> {
        let size = self.config.size();
        let cycles = self.config.cycles;
        let table = Arc::new(RingTable::new(
            size,
            self.signal.clone(),
            self.events.clone(),
            self.config.use_time(),
            self.config.idle_time(),
        ));

        tracing::info!(agents = size, cycles, "Starting resource ring");

        let handles: Vec<_> = self
            .config
            .agents
            .iter()
            .enumerate()
            .map(|(id, name)| {
                let mut agent = Agent::seat(id, name.clone(), size);
                let table = Arc::clone(&table);
                tokio::spawn(async move {
                    if !table.join_ring(&agent).await {
                        return Ok(agent.leave(true, &table));
                    }
                    agent.run_cycles(&table, cycles).await
                })
            })
            .collect();

        let mut agents = Vec::with_capacity(size);
        for result in futures::future::join_all(handles).await {
            agents.push(result??);
        }

        let mut resource_uses = Vec::with_capacity(size);
        for index in 0..size {
            resource_uses.push(table.resources.uses(index).await.unwrap_or(0));
        }

        let total_cycles = agents.iter().map(|a| u64::from(a.cycles)).sum();
        let cancelled = agents.iter().any(|a| a.cancelled);
        if !cancelled {
            self.events.emit(RingEvent::AllFinished { total_cycles });
        }

        tracing::info!(total_cycles, cancelled, "Resource ring finished");

        Ok(RingReport {
            agents,
            total_cycles,
            resource_uses,
            exclusion_violations: table.resources.violations(),
            cancelled,
        })
    }
}
