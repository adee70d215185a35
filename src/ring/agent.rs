//! Agents seated around the ring.

use serde::Serialize;

use crate::error::Result;
use crate::ring::{RingEvent, RingTable};

/// A peer that needs the two resources on either side of its seat
#[derive(Debug, Clone)]
pub struct Agent {
    pub id: usize,
    pub name: String,
    /// Resource shared with the previous agent
    pub left: usize,
    /// Resource shared with the next agent
    pub right: usize,
    cycles: u32,
}

/// What an agent reports when it leaves
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentOutcome {
    pub name: String,
    pub cycles: u32,
    pub cancelled: bool,
}

impl Agent {
    /// Seat agent `id` in a ring of `ring_size`
    ///
    /// Agent 0 sits between the last resource and resource 0.
    pub fn seat(id: usize, name: impl Into<String>, ring_size: usize) -> Self {
        Self {
            id,
            name: name.into(),
            left: (id + ring_size - 1) % ring_size,
            right: id,
            cycles: 0,
        }
    }

    /// Completed cycles so far
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    /// Repeat acquire, use, release, idle until `count` cycles are done
    ///
    /// Stops early, with both resources released, if the table's signal fires.
    pub async fn run_cycles(&mut self, table: &RingTable, count: u32) -> Result<AgentOutcome> {
        while self.cycles < count {
            let acquired = {
                let name = &self.name;
                let pickup = |resource| {
                    table.events.emit(RingEvent::PickedUp {
                        agent: name.clone(),
                        resource,
                    })
                };
                table
                    .signal
                    .guard(table.resources.acquire_pair_with(self.id, self.left, self.right, pickup))
                    .await
            };
            let Some(pair) = acquired else {
                return Ok(self.leave(true, table));
            };
            let pair = pair?;

            table.events.emit(RingEvent::Using {
                agent: self.name.clone(),
                cycle: self.cycles + 1,
            });
            let used = table.signal.sleep(table.use_time).await;

            let (low, high) = pair.release();
            table.events.emit(RingEvent::Released {
                agent: self.name.clone(),
                low,
                high,
            });
            if !used {
                return Ok(self.leave(true, table));
            }

            table.events.emit(RingEvent::Idle {
                agent: self.name.clone(),
            });
            if !table.signal.sleep(table.idle_time).await {
                return Ok(self.leave(true, table));
            }

            self.cycles += 1;
            table.events.emit(RingEvent::AteAndLeft {
                agent: self.name.clone(),
                cycle: self.cycles,
            });
        }

        Ok(self.leave(false, table))
    }

    /// Report the agent as gone, finished or cut short
    pub(crate) fn leave(&self, cancelled: bool, table: &RingTable) -> AgentOutcome {
        if cancelled {
            table.events.emit(RingEvent::Cancelled {
                agent: self.name.clone(),
                cycles: self.cycles,
            });
        } else {
            table.events.emit(RingEvent::Finished {
                agent: self.name.clone(),
                cycles: self.cycles,
            });
        }
        AgentOutcome {
            name: self.name.clone(),
            cycles: self.cycles,
            cancelled,
        }
    }
}
