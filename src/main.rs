use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use serde::Serialize;
use std::fmt::Display;
use std::fs;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

mod cli;

use cli::Cli;
use cli::commands::Commands;
use coordr::config::Config;
use coordr::coordination::ControlSignal;
use coordr::events::EventSink;
use coordr::pipeline::PipelineCoordinator;
use coordr::ring::RingCoordinator;
use coordr::service::ServiceCoordinator;

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("coordr")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("coordr.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

/// Apply subcommand overrides on top of the loaded configuration
fn apply_overrides(config: &mut Config, command: Option<&Commands>) {
    match command {
        Some(Commands::Ring { cycles: Some(cycles) }) => config.ring.cycles = *cycles,
        Some(Commands::Pipeline {
            threshold: Some(threshold),
        }) => config.pipeline.failure_threshold = *threshold,
        Some(Commands::Service {
            customers: Some(customers),
        }) => config.service.expected_total = *customers,
        _ => {}
    }
}

/// Print every event of a run as it arrives; ends when the run drops its sink
fn spawn_printer<E>(json: bool, mut rx: mpsc::UnboundedReceiver<E>, paint: fn(String) -> ColoredString) -> JoinHandle<()>
where
    E: Display + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if !json {
                println!("  {}", paint(event.to_string()));
            }
        }
    })
}

/// Trigger `signal` on Ctrl-C for the lifetime of the returned task
fn watch_interrupt(signal: ControlSignal) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupt received, cancelling run");
            signal.trigger();
        }
    })
}

fn print_report<R: Serialize>(json: bool, title: &str, report: &R, summary: String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report).context("Failed to serialize report")?);
    } else {
        println!("{} {}", format!("{}:", title).green().bold(), summary);
    }
    Ok(())
}

async fn run_ring(cli: &Cli, config: &Config) -> Result<()> {
    if !cli.json {
        println!("{}", "Resource ring".cyan().bold());
    }
    let (events, rx) = EventSink::channel();
    let printer = spawn_printer(cli.json, rx, |s| s.normal());
    let coordinator = RingCoordinator::new(config.ring.clone())?.with_events(events);
    let interrupt = watch_interrupt(coordinator.signal());

    let report = coordinator.run().await.context("Ring run failed")?;
    interrupt.abort();
    printer.await?;

    let summary = format!(
        "{} cycles across {} agents, {} exclusion violations{}",
        report.total_cycles,
        report.agents.len(),
        report.exclusion_violations,
        if report.cancelled { " (cancelled)" } else { "" }
    );
    print_report(cli.json, "Ring", &report, summary)
}

async fn run_pipeline(cli: &Cli, config: &Config) -> Result<()> {
    if !cli.json {
        println!("{}", "Bounded pipeline".cyan().bold());
    }
    let (events, rx) = EventSink::channel();
    let printer = spawn_printer(cli.json, rx, |s| s.blue());
    let coordinator = PipelineCoordinator::new(config.pipeline.clone())?.with_events(events);
    let interrupt = watch_interrupt(coordinator.signal());

    let report = coordinator.run().await.context("Pipeline run failed")?;
    interrupt.abort();
    printer.await?;

    let counts = report.counts;
    let summary = format!(
        "produced {}, failed {}, consumed {}, dropped {}",
        counts.produced, counts.failed, counts.consumed, counts.dropped
    );
    print_report(cli.json, "Pipeline", &report, summary)
}

async fn run_service(cli: &Cli, config: &Config) -> Result<()> {
    if !cli.json {
        println!("{}", "Bounded service".cyan().bold());
    }
    let (events, rx) = EventSink::channel();
    let printer = spawn_printer(cli.json, rx, |s| s.magenta());
    let coordinator = ServiceCoordinator::new(config.service.clone())?.with_events(events);
    let interrupt = watch_interrupt(coordinator.signal());

    let report = coordinator.run().await.context("Service run failed")?;
    interrupt.abort();
    printer.await?;

    let summary = format!(
        "{} served {} of {} ({}){}",
        report.server,
        report.served,
        report.expected,
        report.final_state,
        if report.cancelled { " (cancelled)" } else { "" }
    );
    print_report(cli.json, "Service", &report, summary)
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
        println!("{}", serde_yaml::to_string(config).context("Failed to render config")?.dimmed());
    }

    match &cli.command {
        Some(Commands::Ring { .. }) => run_ring(cli, config).await,
        Some(Commands::Pipeline { .. }) => run_pipeline(cli, config).await,
        Some(Commands::Service { .. }) => run_service(cli, config).await,
        Some(Commands::All) | None => {
            run_ring(cli, config).await?;
            run_pipeline(cli, config).await?;
            run_service(cli, config).await
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    apply_overrides(&mut config, cli.command.as_ref());
    config.validate().context("Invalid configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
