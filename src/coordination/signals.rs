//! Broadcast-once control signal
//!
//! A ControlSignal is shared by every activity of one coordinator run. It starts
//! clear, can be triggered exactly once, and stays triggered for the rest of the
//! run. Activities check it at each suspension point, so it doubles as the
//! cancellation token for coordinators that otherwise only end by exhausting a
//! fixed amount of work.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

/// One-shot termination marker observable by any number of activities
#[derive(Debug, Clone)]
pub struct ControlSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl ControlSignal {
    /// Create a new, untriggered signal
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Trigger the signal
    ///
    /// Returns true only for the call that flipped it; later calls are no-ops.
    pub fn trigger(&self) -> bool {
        self.tx.send_if_modified(|triggered| {
            if *triggered {
                false
            } else {
                *triggered = true;
                true
            }
        })
    }

    /// Check whether the signal has been triggered
    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Wait until the signal is triggered
    pub async fn triggered(&self) {
        let mut rx = self.tx.subscribe();
        // The sender outlives this borrow, so wait_for cannot observe a closed channel.
        let _ = rx.wait_for(|triggered| *triggered).await;
    }

    /// Run a future unless the signal fires first
    ///
    /// Returns None when the signal won the race. A signal that is already
    /// triggered always wins.
    pub async fn guard<F: Future>(&self, fut: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            _ = self.triggered() => None,
            out = fut => Some(out),
        }
    }

    /// Sleep for `duration`, waking early if the signal fires
    ///
    /// Returns true when the full duration elapsed. A zero duration still
    /// yields to the scheduler once.
    pub async fn sleep(&self, duration: Duration) -> bool {
        if duration.is_zero() {
            return self.guard(tokio::task::yield_now()).await.is_some();
        }
        self.guard(tokio::time::sleep(duration)).await.is_some()
    }
}

impl Default for ControlSignal {
    fn default() -> Self {
        Self::new()
    }
}
