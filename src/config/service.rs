//! Bounded service settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{CoordError, Result};

/// Bounded service settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ServiceConfig {
    /// Display name of the server.
    pub server_name: String,

    /// Arrivals that can wait at once; further arrivals block.
    pub waiting_capacity: usize,

    /// Arrivals generated and served before the run ends.
    pub expected_total: usize,

    /// Gaps between arrivals are drawn from `0..arrival_range` units.
    pub arrival_range: u32,

    /// Milliseconds per arrival gap unit.
    pub arrival_unit_ms: u64,

    /// Fixed service time in milliseconds.
    pub service_ms: u64,

    /// RNG seed for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            server_name: "La Fashion".to_string(),
            waiting_capacity: 5,
            expected_total: 10,
            arrival_range: 10,
            arrival_unit_ms: 1000,
            service_ms: 2000,
            seed: None,
        }
    }
}

impl ServiceConfig {
    pub fn with_waiting_capacity(mut self, capacity: usize) -> Self {
        self.waiting_capacity = capacity;
        self
    }

    pub fn with_expected_total(mut self, total: usize) -> Self {
        self.expected_total = total;
        self
    }

    /// Set the arrival gap unit and service time in milliseconds.
    pub fn with_timings(mut self, arrival_unit_ms: u64, service_ms: u64) -> Self {
        self.arrival_unit_ms = arrival_unit_ms;
        self.service_ms = service_ms;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Gap before an arrival of `units` draw units.
    pub fn arrival_gap(&self, units: u32) -> Duration {
        Duration::from_millis(self.arrival_unit_ms.saturating_mul(u64::from(units)))
    }

    pub fn service_time(&self) -> Duration {
        Duration::from_millis(self.service_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.waiting_capacity == 0 {
            return Err(CoordError::InvalidConfig(
                "service.waiting-capacity must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_service() {
        let config = ServiceConfig::default();
        assert_eq!(config.server_name, "La Fashion");
        assert_eq!(config.service_time(), Duration::from_secs(2));
        assert_eq!(config.arrival_gap(4), Duration::from_secs(4));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = ServiceConfig::default().with_waiting_capacity(0);
        assert!(config.validate().is_err());
    }
}
