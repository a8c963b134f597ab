//! The comparator: a diode that compares or subtracts its side input and
//! carries a numeric output, not just an on/off flag.
//!
//! The numeric output is cached in the grid's side table separately from
//! the powered flag, so arithmetic circuits can read the value. A
//! neighbor change schedules a verification tick whenever the recomputed
//! output disagrees with the cache or the powered flag disagrees with
//! the turn-on evaluation; the verification uses the same tie-break
//! priority rule as the repeater.

use pulse_types::{BlockKind, BlockPos, BlockState, ComparatorMode, Direction, EngineEvent};
use pulse_world::signal::{self, SideInputs};
use pulse_world::Grid;
use tracing::debug;

use crate::diode::{self, DiodeBehavior};
use crate::engine::{Simulation, UpdateFlags};
use crate::notify;

/// Verification delay in ticks.
pub const COMPARATOR_DELAY_TICKS: u64 = 1;

/// Capability implementation for comparators.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComparatorBehavior;

impl DiodeBehavior for ComparatorBehavior {
    fn kind(&self) -> BlockKind {
        BlockKind::Comparator
    }

    fn delay(&self, _state: BlockState) -> u64 {
        COMPARATOR_DELAY_TICKS
    }

    fn should_turn_on(&self, sim: &Simulation, pos: BlockPos, state: BlockState) -> bool {
        let BlockState::Comparator { facing, mode, .. } = state else {
            return false;
        };
        let input = signal::comparator_input_signal(sim.grid(), pos, facing);
        if input == 0 {
            return false;
        }
        let alternate = signal::alternate_signal(sim.grid(), pos, facing, SideInputs::Any);
        input > alternate || (input == alternate && mode == ComparatorMode::Compare)
    }

    fn output_signal(&self, sim: &Simulation, pos: BlockPos, state: BlockState) -> u8 {
        let BlockState::Comparator { facing, mode, .. } = state else {
            return 0;
        };
        calculate_output(sim.grid(), pos, facing, mode)
    }
}

/// The comparator arithmetic: 0 when unfed or overridden by a stronger
/// side input, otherwise the input (compare) or the difference
/// (subtract).
pub fn calculate_output(
    grid: &Grid,
    pos: BlockPos,
    facing: Direction,
    mode: ComparatorMode,
) -> u8 {
    let input = signal::comparator_input_signal(grid, pos, facing);
    if input == 0 {
        return 0;
    }
    let alternate = signal::alternate_signal(grid, pos, facing, SideInputs::Any);
    if alternate > input {
        0
    } else {
        match mode {
            ComparatorMode::Compare => input,
            ComparatorMode::Subtract => input.saturating_sub(alternate),
        }
    }
}

/// React to a neighbor change: schedule a verification tick if either
/// the cached output or the powered flag is out of date.
pub(crate) fn check_on_neighbor(sim: &mut Simulation, pos: BlockPos) {
    let state = sim.grid().state(pos);
    if state.kind() != BlockKind::Comparator
        || sim.will_fire_this_tick(pos, BlockKind::Comparator)
    {
        return;
    }
    let output = ComparatorBehavior.output_signal(sim, pos, state);
    let cached = sim.grid().comparator_output(pos);
    let powered = state.is_powered();
    let desired = ComparatorBehavior.should_turn_on(sim, pos, state);
    if output != cached || powered != desired {
        let priority = diode::tick_priority(sim, pos, state, powered);
        debug!(%pos, output, cached, desired, %priority, "verification scheduled");
        sim.schedule(pos, BlockKind::Comparator, COMPARATOR_DELAY_TICKS, priority);
    }
}

/// Fire a verification tick: refresh the cached output and the powered
/// flag, fanning out toward the front if either changed.
pub(crate) fn fire(sim: &mut Simulation, pos: BlockPos) {
    let state = sim.grid().state(pos);
    if state.kind() != BlockKind::Comparator {
        return;
    }
    let output = ComparatorBehavior.output_signal(sim, pos, state);
    let cached = sim.grid().comparator_output(pos);
    let powered = state.is_powered();
    let desired = ComparatorBehavior.should_turn_on(sim, pos, state);
    if output == cached && powered == desired {
        return;
    }
    sim.set_comparator_output(pos, output);
    let next = state.with_powered(desired);
    let _ = sim.set_block_state(pos, next, UpdateFlags::OBSERVERS_ONLY);
    notify::update_neighbors_in_front(sim, pos, next);
}

/// Toggle between compare and subtract mode and schedule a verification
/// tick so the output settles under the new rule.
pub(crate) fn toggle_mode(sim: &mut Simulation, pos: BlockPos) {
    let state = sim.grid().state(pos);
    let BlockState::Comparator { mode, .. } = state else {
        return;
    };
    let next_mode = mode.toggled();
    let _ = sim.set_block_state(pos, state.with_mode(next_mode), UpdateFlags::OBSERVERS_ONLY);
    sim.push_event(EngineEvent::Click {
        pos,
        activated: next_mode == ComparatorMode::Subtract,
    });
    check_on_neighbor(sim, pos);
}
