//! Headless park runner.
//!
//! Loads a scenario, runs it for the configured number of ticks and prints
//! the run totals plus every agent's final state as JSON on stdout. Logs go
//! to stderr and, optionally, to a file.
mod config;

use anyhow::{Context, Result};
use config::{LogConfig, SimConfig};
use park_core::AgentState;
use park_runtime::{BehaviorEvent, Event, RunSummary, Scenario, Simulation, Topic};
use serde::Serialize;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Serialize)]
struct Report<'a> {
    summary: RunSummary,
    agents: Vec<&'a AgentState>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = SimConfig::from_env();
    setup_logging(&config.log)?;

    let scenario = Scenario::load_from_file(&config.scenario)
        .with_context(|| format!("Failed to load scenario {}", config.scenario.display()))?;
    let ticks = config.ticks.unwrap_or(scenario.ticks);

    let mut simulation = Simulation::from_scenario(&scenario)?;
    let logger = tokio::spawn(log_behavior(simulation.subscribe(Topic::Behavior)?));

    let summary = simulation.run(ticks);
    let report = Report {
        summary,
        agents: simulation.entities().agents().collect(),
    };
    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    println!("{json}");

    // Dropping the simulation closes the bus and lets the logger drain.
    drop(simulation);
    logger.await?;
    Ok(())
}

async fn log_behavior(mut events: broadcast::Receiver<Event>) {
    loop {
        match events.recv().await {
            Ok(Event::Behavior(event)) => match event {
                BehaviorEvent::Started {
                    agent,
                    behavior,
                    tick,
                } => tracing::info!(%agent, %behavior, %tick, "behavior started"),
                BehaviorEvent::Terminated { agent, tick } => {
                    tracing::info!(%agent, %tick, "behavior ended")
                }
                BehaviorEvent::CommandApplied { command, tick } => {
                    tracing::info!(?command, %tick, "command applied")
                }
                BehaviorEvent::CommandsRejected { count, tick } => {
                    tracing::warn!(count, %tick, "commands rejected")
                }
            },
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "behavior log fell behind");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

/// Logs to stderr, and to `park.log` in the log directory when enabled.
fn setup_logging(log: &LogConfig) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    if !log.to_file {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
        return Ok(());
    }

    let log_dir = log.directory();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;
    let file_appender = tracing_appender::rolling::never(&log_dir, "park.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    // Leak the guard to keep file writer alive
    std::mem::forget(guard);

    tracing::info!("Log file: {}/park.log", log_dir.display());
    Ok(())
}
