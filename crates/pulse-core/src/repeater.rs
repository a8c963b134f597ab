//! The repeater: a fixed-strength diode with a configurable delay and a
//! side-input lock.

use pulse_types::{BlockKind, BlockPos, BlockState};
use pulse_world::signal::{self, SideInputs};

use crate::diode::{self, DiodeBehavior};
use crate::engine::{Simulation, UpdateFlags};

/// Capability implementation for repeaters.
#[derive(Debug, Clone, Copy, Default)]
pub struct RepeaterBehavior;

impl DiodeBehavior for RepeaterBehavior {
    fn kind(&self) -> BlockKind {
        BlockKind::Repeater
    }

    fn delay(&self, state: BlockState) -> u64 {
        match state {
            BlockState::Repeater { delay, .. } => u64::from(delay),
            _ => 1,
        }
    }

    fn should_turn_on(&self, sim: &Simulation, pos: BlockPos, state: BlockState) -> bool {
        let Some(facing) = state.facing() else {
            return false;
        };
        signal::diode_input_signal(sim.grid(), pos, facing) > 0
    }

    fn is_locked(&self, sim: &Simulation, pos: BlockPos, state: BlockState) -> bool {
        let Some(facing) = state.facing() else {
            return false;
        };
        signal::alternate_signal(sim.grid(), pos, facing, SideInputs::DiodesOnly) > 0
    }
}

/// Handle a neighbor change: refresh the lock property, then run the
/// generic diode check.
///
/// A locked repeater freezes with whatever output it had; the lock flag
/// itself is ordinary state so watchers and serialization see it.
pub(crate) fn on_neighbor_changed(sim: &mut Simulation, pos: BlockPos) {
    let state = sim.grid().state(pos);
    let BlockState::Repeater { locked, .. } = state else {
        return;
    };
    let now_locked = RepeaterBehavior.is_locked(sim, pos, state);
    if now_locked != locked {
        let _ = sim.set_block_state(
            pos,
            state.with_locked(now_locked),
            UpdateFlags::OBSERVERS_ONLY,
        );
    }
    diode::check_on_neighbor(sim, &RepeaterBehavior, pos);
}
