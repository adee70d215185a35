//! Countdown latch
//!
//! Holds the number of outstanding completions. Waiters resume once it reaches
//! zero; decrements below zero are ignored.

use std::sync::Arc;

use tokio::sync::watch;

/// Counting signal released at zero
#[derive(Debug, Clone)]
pub struct Countdown {
    tx: Arc<watch::Sender<usize>>,
}

impl Countdown {
    /// Create a countdown expecting `count` completions
    pub fn new(count: usize) -> Self {
        let (tx, _rx) = watch::channel(count);
        Self { tx: Arc::new(tx) }
    }

    /// Record one completion and return what is still outstanding
    pub fn count_down(&self) -> usize {
        let mut remaining = 0;
        self.tx.send_if_modified(|count| {
            if *count == 0 {
                return false;
            }
            *count -= 1;
            remaining = *count;
            true
        });
        remaining
    }

    /// Outstanding completions
    pub fn remaining(&self) -> usize {
        *self.tx.borrow()
    }

    /// Check whether the count reached zero
    pub fn is_done(&self) -> bool {
        self.remaining() == 0
    }

    /// Wait until the count reaches zero
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        let _ = rx.wait_for(|count| *count == 0).await;
    }
}
