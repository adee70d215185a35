//! Scenario integration tests
//!
//! Runs each coordinator end to end through the public API with short timings.

use std::time::Duration;

use coordr::config::{Config, PipelineConfig, RingConfig, ServiceConfig};
use coordr::coordination::{ControlSignal, Scripted};
use coordr::events::{EventSink, drain};
use coordr::pipeline::{PipelineCoordinator, PipelineEvent, ProducerExit};
use coordr::ring::{RingCoordinator, RingEvent};
use coordr::service::{ServerState, ServiceCoordinator, ServiceEvent};

/// Five agents, three cycles each: fifteen completed cycles, then termination
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_ring_five_agents_three_cycles() {
    let config = RingConfig::default().with_timings(2, 1);
    let (events, mut rx) = EventSink::channel();

    let report = tokio::time::timeout(
        Duration::from_secs(10),
        RingCoordinator::new(config).unwrap().with_events(events).run(),
    )
    .await
    .expect("ring should terminate")
    .unwrap();

    assert_eq!(report.total_cycles, 15);
    assert_eq!(report.exclusion_violations, 0);
    assert!(!report.cancelled);

    let events = drain(&mut rx);
    let completed = events.iter().filter(|e| matches!(e, RingEvent::AteAndLeft { .. })).count();
    assert_eq!(completed, 15);
    assert!(matches!(events.last(), Some(RingEvent::AllFinished { total_cycles: 15 })));
}

/// Capacity 5, threshold 2: the third failure shuts production down
#[tokio::test]
async fn test_pipeline_stops_on_third_failure() {
    let config = PipelineConfig::default().with_timings(1, 1);
    let draws = Scripted::new([0, 1, 4, 2, 3, 4, 1, 4, 0, 0]);
    let (events, mut rx) = EventSink::channel();

    let report = PipelineCoordinator::new(config)
        .unwrap()
        .with_draw(draws)
        .with_events(events)
        .run()
        .await
        .unwrap();

    assert_eq!(report.exit, ProducerExit::FailureThreshold { failed: 3 });
    assert_eq!(report.counts.produced, 8);
    assert!(report.counts.consumed > 0);
    assert!(report.counts.consumed <= report.counts.produced);

    let events = drain(&mut rx);
    assert!(events.iter().any(|e| matches!(e, PipelineEvent::Shutdown { failed: 3, .. })));
    assert!(matches!(events.last(), Some(PipelineEvent::ConsumerDone { .. })));
}

/// Ten customers through a room of five, all served, idle reported before each
#[tokio::test]
async fn test_service_serves_every_customer() {
    let config = ServiceConfig::default().with_timings(1, 2).with_seed(42);
    let (events, mut rx) = EventSink::channel();

    let report = ServiceCoordinator::new(config)
        .unwrap()
        .with_events(events)
        .run()
        .await
        .unwrap();

    assert_eq!(report.served, 10);
    assert_eq!(report.final_state, ServerState::Closed);

    let started = drain(&mut rx)
        .into_iter()
        .filter(|e| matches!(e, ServiceEvent::Started { .. }))
        .count();
    assert_eq!(started, 10);
}

/// A signal fired before the run cancels every coordinator promptly
#[tokio::test]
async fn test_pre_cancelled_runs_return() {
    let config = Config::default();

    let signal = ControlSignal::new();
    signal.trigger();
    let ring = RingCoordinator::new(config.ring.clone())
        .unwrap()
        .with_signal(signal)
        .run()
        .await
        .unwrap();
    assert!(ring.cancelled);
    assert_eq!(ring.total_cycles, 0);

    let signal = ControlSignal::new();
    signal.trigger();
    let pipeline = PipelineCoordinator::new(config.pipeline.clone())
        .unwrap()
        .with_signal(signal)
        .run()
        .await
        .unwrap();
    assert_eq!(pipeline.exit, ProducerExit::Cancelled);
    assert_eq!(pipeline.counts.produced, 0);

    let signal = ControlSignal::new();
    signal.trigger();
    let service = ServiceCoordinator::new(config.service.clone())
        .unwrap()
        .with_signal(signal)
        .run()
        .await
        .unwrap();
    assert!(service.cancelled);
    assert_eq!(service.served, 0);
}

/// Config loaded from YAML drives the coordinators
#[tokio::test]
async fn test_yaml_config_drives_ring() {
    let yaml = "ring:\n  agents: [a, b, c]\n  cycles: 2\n  use-ms: 1\n  idle-ms: 1\n";
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    config.validate().unwrap();

    let report = RingCoordinator::new(config.ring).unwrap().run().await.unwrap();
    assert_eq!(report.agents.len(), 3);
    assert_eq!(report.total_cycles, 6);
}
