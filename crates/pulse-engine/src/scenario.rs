//! Demo circuit construction for the scenario runner.
//!
//! Each builder assembles a small circuit in a fresh [`Simulation`] and
//! returns the cells worth watching while the tick loop runs.

use pulse_core::Simulation;
use pulse_types::{BlockPos, BlockState, ComparatorMode, Direction};

use crate::config::ScenarioConfig;
use crate::error::RunnerError;

/// A built scenario: the simulation plus the cells the runner reports on.
#[derive(Debug)]
pub struct Scenario {
    /// The assembled simulation.
    pub sim: Simulation,
    /// Human-readable scenario name for logs.
    pub name: &'static str,
    /// Cells whose state the runner logs each tick.
    pub probes: Vec<(&'static str, BlockPos)>,
    /// Lever to throw once assembly is done, for edge-driven circuits.
    pub input: Option<BlockPos>,
}

/// Build the configured scenario.
///
/// # Errors
///
/// Returns [`RunnerError::InvalidScenario`] for out-of-range parameters.
pub fn build(config: &ScenarioConfig) -> Result<Scenario, RunnerError> {
    match *config {
        ScenarioConfig::RepeaterChain { length, delay } => repeater_chain(length, delay),
        ScenarioConfig::TorchClock => Ok(torch_clock()),
        ScenarioConfig::ComparatorSubtract { input, side } => {
            Ok(comparator_subtract(input, side))
        }
    }
}

/// A lever-driven chain of repeaters ending in a lamp.
fn repeater_chain(length: u32, delay: u8) -> Result<Scenario, RunnerError> {
    if length == 0 {
        return Err(RunnerError::InvalidScenario {
            reason: "repeater chain length must be at least 1".to_owned(),
        });
    }
    let length = i32::try_from(length).map_err(|_err| RunnerError::InvalidScenario {
        reason: format!("repeater chain length {length} out of range"),
    })?;

    let mut sim = Simulation::new();
    let lever = BlockPos::ORIGIN;
    sim.set_block(lever, BlockState::lever(Direction::East));
    for x in 1..=length {
        sim.set_block(BlockPos::new(x, 0, 0), BlockState::repeater(Direction::West, delay));
    }
    let lamp = BlockPos::new(length.saturating_add(1), 0, 0);
    sim.set_block(lamp, BlockState::lamp());

    Ok(Scenario {
        sim,
        name: "repeater-chain",
        probes: vec![("lever", lever), ("lamp", lamp)],
        input: Some(lever),
    })
}

/// A ceiling torch wired back onto its own support: a free-running clock
/// that oscillates until the toggle-storm guard freezes it.
fn torch_clock() -> Scenario {
    let mut sim = Simulation::new();
    let torch = BlockPos::ORIGIN;
    let support = torch.above();
    sim.set_block(support, BlockState::Conductor);
    // Facing down: the support above is also the torch's strong target,
    // closing the feedback loop.
    sim.set_block(torch, BlockState::torch(Direction::Down));

    Scenario {
        sim,
        name: "torch-clock",
        probes: vec![("torch", torch)],
        input: None,
    }
}

/// A comparator in subtract mode fed by two constant sources.
fn comparator_subtract(input: u8, side: u8) -> Scenario {
    let mut sim = Simulation::new();
    let comparator = BlockPos::ORIGIN;
    sim.set_block(
        comparator.relative(Direction::West),
        BlockState::power_source(input),
    );
    sim.set_block(
        comparator.relative(Direction::North),
        BlockState::power_source(side),
    );
    sim.set_block(
        comparator,
        BlockState::comparator(Direction::West, ComparatorMode::Subtract),
    );
    let lamp = comparator.relative(Direction::East);
    sim.set_block(lamp, BlockState::lamp());

    Scenario {
        sim,
        name: "comparator-subtract",
        probes: vec![("comparator", comparator), ("lamp", lamp)],
        input: None,
    }
}

/// Throw the scenario's input lever, if it has one.
///
/// # Errors
///
/// Returns [`RunnerError::Engine`] if the input cell is not a lever.
pub fn kick(scenario: &mut Scenario) -> Result<(), RunnerError> {
    if let Some(lever) = scenario.input {
        scenario.sim.toggle_lever(lever)?;
    }
    Ok(())
}
