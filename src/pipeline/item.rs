//! Work items moved through the pipeline.

use serde::Serialize;

/// A unit of work with a simulated cost
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkItem {
    pub id: u64,
    pub payload: String,
    pub cost: u32,
    pub failed: bool,
}

impl WorkItem {
    /// Build item `id`; it is failed when `cost` reaches `failure_cutoff`
    pub fn new(id: u64, cost: u32, failure_cutoff: u32) -> Self {
        Self {
            id,
            payload: format!("item #{} generated", id),
            cost,
            failed: cost >= failure_cutoff,
        }
    }
}
