//! Runs the producer and the consumer pool until shutdown and drain.

use std::sync::Arc;

use rand::rngs::StdRng;
use serde::Serialize;
use tokio::sync::{Mutex, mpsc};

use crate::config::PipelineConfig;
use crate::coordination::{ControlSignal, Draw, rng_from_seed};
use crate::error::Result;
use crate::events::EventSink;
use crate::pipeline::{
    Consumer, ConsumerOutcome, PipelineControl, PipelineCounts, PipelineEvent, PipelineStats, Producer, ProducerExit,
};

/// Result of a pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    #[serde(flatten)]
    pub counts: PipelineCounts,
    pub exit: ProducerExit,
    pub consumers: Vec<ConsumerOutcome>,
}

/// Coordinates one producer and a pool of consumers over a bounded conduit
pub struct PipelineCoordinator<D: Draw = StdRng> {
    config: PipelineConfig,
    draw: D,
    cancel: ControlSignal,
    events: EventSink<PipelineEvent>,
}

impl PipelineCoordinator<StdRng> {
    /// Create a coordinator drawing costs from the configured RNG
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let draw = rng_from_seed(config.seed);
        Ok(Self {
            config,
            draw,
            cancel: ControlSignal::new(),
            events: EventSink::silent(),
        })
    }
}

impl<D: Draw> PipelineCoordinator<D> {
    /// Replace the source of item costs
    pub fn with_draw<E: Draw>(self, draw: E) -> PipelineCoordinator<E> {
        PipelineCoordinator {
            config: self.config,
            draw,
            cancel: self.cancel,
            events: self.events,
        }
    }

    /// Use an externally owned cancellation token
    pub fn with_signal(mut self, signal: ControlSignal) -> Self {
        self.cancel = signal;
        self
    }

    pub fn with_events(mut self, events: EventSink<PipelineEvent>) -> Self {
        self.events = events;
        self
    }

    /// Token that cancels this run, drain included
    pub fn signal(&self) -> ControlSignal {
        self.cancel.clone()
    }

    /// Run until the producer shuts down, then wait for the consumers to drain
    pub async fn run(self) -> Result<PipelineReport> {
        let control = PipelineControl::new(self.cancel.clone());
        let (tx, rx) = mpsc::channel(self.config.capacity);
        let conduit = Arc::new(Mutex::new(rx));
        let stats = Arc::new(PipelineStats::new());

        tracing::info!(
            capacity = self.config.capacity,
            consumers = self.config.consumers,
            failure_threshold = self.config.failure_threshold,
            "Starting bounded pipeline"
        );

        let consumers: Vec<_> = (0..self.config.consumers)
            .map(|id| {
                let consumer = Consumer::new(
                    id,
                    self.config.clone(),
                    Arc::clone(&conduit),
                    Arc::clone(&stats),
                    control.clone(),
                    self.events.clone(),
                );
                tokio::spawn(consumer.consume())
            })
            .collect();

        let producer = Producer::new(
            self.config.clone(),
            self.draw,
            tx,
            Arc::clone(&stats),
            control.clone(),
            self.events.clone(),
        );
        let mut producer = tokio::spawn(producer.produce());

        // The producer triggers shutdown on every exit path; a finished
        // producer also ends the wait so a panic cannot hang the run.
        let finished = tokio::select! {
            _ = control.shutdown.triggered() => None,
            result = &mut producer => Some(result),
        };
        let exit = match finished {
            Some(result) => result?,
            None => producer.await?,
        };

        let mut outcomes = Vec::with_capacity(consumers.len());
        for result in futures::future::join_all(consumers).await {
            outcomes.push(result?);
        }

        let counts = stats.snapshot();
        tracing::info!(
            produced = counts.produced,
            failed = counts.failed,
            consumed = counts.consumed,
            dropped = counts.dropped,
            "Bounded pipeline drained"
        );

        Ok(PipelineReport {
            counts,
            exit,
            consumers: outcomes,
        })
    }
}
