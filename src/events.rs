//! Progress notifications.
//!
//! Every coordinator narrates its state transitions through an `EventSink`.
//! Each event is logged and, when a receiver is attached, forwarded in order
//! over an unbounded channel so a front end or a test can replay the run.

use std::fmt;

use tokio::sync::mpsc;

/// Sink for progress events of type `E`
#[derive(Debug)]
pub struct EventSink<E> {
    tx: Option<mpsc::UnboundedSender<E>>,
}

impl<E> Clone for EventSink<E> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone() }
    }
}

impl<E> Default for EventSink<E> {
    fn default() -> Self {
        Self::silent()
    }
}

impl<E> EventSink<E> {
    /// A sink that only logs
    pub fn silent() -> Self {
        Self { tx: None }
    }

    /// A sink paired with the receiver that will see every event
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<E>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }
}

impl<E: fmt::Display> EventSink<E> {
    /// Log the event and forward it to the receiver, if any
    pub fn emit(&self, event: E) {
        log::info!("{}", event);
        if let Some(tx) = &self.tx {
            // A dropped receiver only means nobody is listening anymore
            let _ = tx.send(event);
        }
    }
}

/// Collect everything currently buffered in a receiver
pub fn drain<E>(rx: &mut mpsc::UnboundedReceiver<E>) -> Vec<E> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
