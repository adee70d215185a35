//! Progress notifications emitted by the ring.

use std::fmt;

/// State transitions of agents around the ring
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RingEvent {
    /// Agent joined and waits for the others
    Seated { agent: String },
    /// Agent locked one of its resources
    PickedUp { agent: String, resource: usize },
    /// Agent holds both resources and works
    Using { agent: String, cycle: u32 },
    /// Agent put both resources back
    Released { agent: String, low: usize, high: usize },
    /// Agent rests between cycles
    Idle { agent: String },
    /// Agent completed a full cycle
    AteAndLeft { agent: String, cycle: u32 },
    /// Agent completed all of its cycles
    Finished { agent: String, cycles: u32 },
    /// Agent stopped early because the run was cancelled
    Cancelled { agent: String, cycles: u32 },
    /// Every agent finished
    AllFinished { total_cycles: u64 },
}

impl fmt::Display for RingEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RingEvent::Seated { agent } => write!(f, "{} is seated", agent),
            RingEvent::PickedUp { agent, resource } => write!(f, "\t{} picked up resource {}", agent, resource),
            RingEvent::Using { agent, cycle } => write!(f, "{} is eating (cycle {})", agent, cycle),
            RingEvent::Released { agent, low, high } => {
                write!(f, "\t{} put down resources {} and {}", agent, low, high)
            }
            RingEvent::Idle { agent } => write!(f, "{} is thinking", agent),
            RingEvent::AteAndLeft { agent, cycle } => write!(f, "{} ate and left (cycle {})", agent, cycle),
            RingEvent::Finished { agent, cycles } => write!(f, "{} is done after {} cycles", agent, cycles),
            RingEvent::Cancelled { agent, cycles } => {
                write!(f, "{} stopped early after {} cycles", agent, cycles)
            }
            RingEvent::AllFinished { total_cycles } => {
                write!(f, "Everyone ate and left ({} cycles in total)", total_cycles)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pickup() {
        let event = RingEvent::PickedUp {
            agent: "Tom".to_string(),
            resource: 1,
        };
        assert_eq!(event.to_string(), "\tTom picked up resource 1");
    }

    #[test]
    fn test_display_ate_and_left() {
        let event = RingEvent::AteAndLeft {
            agent: "Harvey".to_string(),
            cycle: 3,
        };
        assert_eq!(event.to_string(), "Harvey ate and left (cycle 3)");
    }
}
