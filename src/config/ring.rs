//! Resource ring settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{CoordError, Result};

/// Names of the agents seated around the default ring.
pub const DEFAULT_AGENTS: [&str; 5] = ["Rushil", "Tom", "James", "Jason", "Harvey"];

/// Resource ring settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RingConfig {
    /// Agent names in seating order. The ring has one resource per agent.
    pub agents: Vec<String>,

    /// Acquire/use/release cycles each agent performs.
    pub cycles: u32,

    /// Time spent holding both resources, in milliseconds.
    pub use_ms: u64,

    /// Time spent idle between cycles, in milliseconds.
    pub idle_ms: u64,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            agents: DEFAULT_AGENTS.iter().map(|name| name.to_string()).collect(),
            cycles: 3,
            use_ms: 3000,
            idle_ms: 2000,
        }
    }
}

impl RingConfig {
    /// Ring of `count` generically named agents.
    pub fn with_agent_count(mut self, count: usize) -> Self {
        self.agents = (0..count).map(|i| format!("agent-{}", i)).collect();
        self
    }

    /// Set the number of cycles per agent.
    pub fn with_cycles(mut self, cycles: u32) -> Self {
        self.cycles = cycles;
        self
    }

    /// Set use and idle durations in milliseconds.
    pub fn with_timings(mut self, use_ms: u64, idle_ms: u64) -> Self {
        self.use_ms = use_ms;
        self.idle_ms = idle_ms;
        self
    }

    /// Number of agents, which is also the number of resources.
    pub fn size(&self) -> usize {
        self.agents.len()
    }

    pub fn use_time(&self) -> Duration {
        Duration::from_millis(self.use_ms)
    }

    pub fn idle_time(&self) -> Duration {
        Duration::from_millis(self.idle_ms)
    }

    /// Reject rings that cannot run.
    pub fn validate(&self) -> Result<()> {
        if self.size() < 2 {
            return Err(CoordError::InvalidConfig(format!(
                "ring needs at least 2 agents, got {}",
                self.size()
            )));
        }
        if self.cycles == 0 {
            return Err(CoordError::InvalidConfig("ring.cycles must be > 0".to_string()));
        }
        Ok(())
    }
}
