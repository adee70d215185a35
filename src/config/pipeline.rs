//! Bounded pipeline settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{CoordError, Result};

/// Bounded pipeline settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PipelineConfig {
    /// Conduit capacity. Items beyond it are dropped.
    pub capacity: usize,

    /// Failed items tolerated; the next one shuts the pipeline down.
    pub failure_threshold: u32,

    /// Number of consumer activities.
    pub consumers: usize,

    /// Item costs are drawn from `0..draw_range`.
    pub draw_range: u32,

    /// Items whose cost is at or above this value are failed.
    pub failure_cutoff: u32,

    /// Milliseconds of generation time per unit of cost.
    pub generation_unit_ms: u64,

    /// Processing takes this many times the generation time.
    pub processing_factor: u32,

    /// RNG seed for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            capacity: 5,
            failure_threshold: 2,
            consumers: 1,
            draw_range: 5,
            failure_cutoff: 4,
            generation_unit_ms: 1000,
            processing_factor: 10,
            seed: None,
        }
    }
}

impl PipelineConfig {
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_failure_threshold(mut self, threshold: u32) -> Self {
        self.failure_threshold = threshold;
        self
    }

    pub fn with_consumers(mut self, consumers: usize) -> Self {
        self.consumers = consumers;
        self
    }

    /// Set the generation unit and processing factor.
    pub fn with_timings(mut self, generation_unit_ms: u64, processing_factor: u32) -> Self {
        self.generation_unit_ms = generation_unit_ms;
        self.processing_factor = processing_factor;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Time to generate an item of the given cost.
    pub fn generation_delay(&self, cost: u32) -> Duration {
        Duration::from_millis(self.generation_unit_ms.saturating_mul(u64::from(cost)))
    }

    /// Time to process an item of the given cost.
    pub fn processing_time(&self, cost: u32) -> Duration {
        self.generation_delay(cost).saturating_mul(self.processing_factor)
    }

    /// Reject pipelines that cannot run or can never terminate.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(CoordError::InvalidConfig("pipeline.capacity must be > 0".to_string()));
        }
        if self.consumers == 0 {
            return Err(CoordError::InvalidConfig("pipeline.consumers must be > 0".to_string()));
        }
        if self.draw_range == 0 {
            return Err(CoordError::InvalidConfig("pipeline.draw-range must be > 0".to_string()));
        }
        // Failures are the only way the pipeline stops on its own
        if self.failure_cutoff >= self.draw_range {
            return Err(CoordError::InvalidConfig(format!(
                "pipeline.failure-cutoff {} is unreachable with draw-range {}",
                self.failure_cutoff, self.draw_range
            )));
        }
        Ok(())
    }
}
