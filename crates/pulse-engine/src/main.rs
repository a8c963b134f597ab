//! Scenario runner binary for the Pulse signal engine.
//!
//! Wires together configuration, structured logging, scenario
//! construction, and the tick loop. Loads `pulse-config.yaml` from the
//! working directory when present, builds the configured demo circuit,
//! runs it for the configured number of ticks, and logs what the probed
//! cells did.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `pulse-config.yaml`
//! 3. Build the configured scenario
//! 4. Run the tick loop, logging per-tick summaries and probe states
//! 5. Log the final grid and drained engine events

mod config;
mod error;
mod scenario;

use std::path::Path;

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::RunnerConfig;
use crate::error::RunnerError;

/// Application entry point for the scenario runner.
///
/// # Errors
///
/// Returns an error if configuration loading or scenario construction
/// fails; the tick loop itself only fails on tick-counter exhaustion.
fn main() -> anyhow::Result<()> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("pulse-engine starting");

    // 2. Load configuration.
    let config = load_config()?;
    info!(ticks = config.ticks, scenario = ?config.scenario, "Configuration loaded");

    // 3. Build the scenario.
    let mut built = scenario::build(&config.scenario)?;
    scenario::kick(&mut built)?;
    info!(
        scenario = built.name,
        cells = built.sim.grid().cell_count(),
        "Scenario assembled"
    );

    // 4. Run the tick loop.
    for _ in 0..config.ticks {
        let summary = built.sim.advance_tick()?;
        debug!(
            tick = summary.tick,
            fired = summary.fired.len(),
            discarded = summary.discarded,
            changed = summary.changed,
            "step"
        );
        for &(label, pos) in &built.probes {
            let state = built.sim.grid().state(pos);
            debug!(tick = summary.tick, probe = label, %pos, powered = state.is_powered(), "probe");
        }
    }

    // 5. Log the outcome.
    let events = built.sim.take_events();
    info!(
        final_tick = built.sim.tick(),
        pending = built.sim.queue().len(),
        events = events.len(),
        "Run complete"
    );
    for &(label, pos) in &built.probes {
        let state = built.sim.grid().state(pos);
        info!(probe = label, %pos, ?state, "final probe state");
    }

    Ok(())
}

/// Load the runner configuration from `pulse-config.yaml`.
///
/// Falls back to defaults when the file does not exist.
fn load_config() -> Result<RunnerConfig, RunnerError> {
    let config_path = Path::new("pulse-config.yaml");
    if config_path.exists() {
        let config = RunnerConfig::from_file(config_path)?;
        Ok(config)
    } else {
        info!("Config file not found, using defaults");
        Ok(RunnerConfig::default())
    }
}
