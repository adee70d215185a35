//! Shutdown and cancellation for one pipeline run.

use crate::coordination::ControlSignal;

/// The two signals a pipeline activity watches
///
/// `shutdown` is triggered by the producer when it stops; consumers react by
/// draining the conduit. `cancel` comes from outside and stops every activity
/// at its next suspension point, drain included.
#[derive(Debug, Clone, Default)]
pub struct PipelineControl {
    pub shutdown: ControlSignal,
    pub cancel: ControlSignal,
}

impl PipelineControl {
    /// Fresh shutdown signal around an existing cancellation token
    pub fn new(cancel: ControlSignal) -> Self {
        Self {
            shutdown: ControlSignal::new(),
            cancel,
        }
    }
}
