//! The torch: an inverting emitter guarded against toggle storms.
//!
//! A torch reads its support cell (the one its facing points away from)
//! and emits the inverse: lit while the support carries no signal,
//! dark while it does. Flips are deferred through the queue like every
//! other transition. Each turn-off is logged with the toggle-storm
//! guard; a storm freezes the torch dark, emits a burnout event, and
//! schedules a re-check after the recovery cooldown. Relighting only
//! happens once the input is gone *and* the guard's window has drained
//! naturally.

use pulse_types::{BlockKind, BlockPos, BlockState, Direction, EngineEvent, TickPriority};
use pulse_world::signal;
use pulse_world::Grid;
use tracing::debug;

use crate::engine::{Simulation, UpdateFlags};
use crate::guard::BURNOUT_RECOVERY_TICKS;
use crate::notify;

/// Flip delay in ticks.
pub const TORCH_DELAY_TICKS: u64 = 2;

/// Whether the torch's support cell currently feeds it signal.
pub fn has_input_signal(grid: &Grid, pos: BlockPos, facing: Direction) -> bool {
    let input_dir = facing.opposite();
    signal::signal(grid, pos.relative(input_dir), input_dir) > 0
}

/// React to a neighbor change: when the lit flag agrees with the input
/// (an inverter in a contradictory state), schedule a flip.
pub(crate) fn on_neighbor_changed(sim: &mut Simulation, pos: BlockPos) {
    let BlockState::Torch { facing, lit } = sim.grid().state(pos) else {
        return;
    };
    if lit == has_input_signal(sim.grid(), pos, facing)
        && !sim.queue().has_scheduled(pos, BlockKind::Torch)
    {
        sim.schedule(pos, BlockKind::Torch, TORCH_DELAY_TICKS, TickPriority::Normal);
    }
}

/// Fire a scheduled flip.
pub(crate) fn fire(sim: &mut Simulation, pos: BlockPos) {
    let BlockState::Torch { facing, lit } = sim.grid().state(pos) else {
        return;
    };
    let has_input = has_input_signal(sim.grid(), pos, facing);
    if lit {
        if has_input {
            let next = BlockState::Torch { facing, lit: false };
            let _ = sim.set_block_state(pos, next, UpdateFlags::ALL);
            // The strong target above may relay through a conductor whose
            // own state never changes; ring its consumers too.
            notify::update_neighbors_of(sim, pos.above());
            if sim.guard_check(pos, true) {
                debug!(%pos, "torch burned out");
                sim.push_event(EngineEvent::Burnout { pos });
                sim.schedule(
                    pos,
                    BlockKind::Torch,
                    BURNOUT_RECOVERY_TICKS,
                    TickPriority::Normal,
                );
            }
        }
    } else if !has_input && !sim.guard_check(pos, false) {
        let next = BlockState::Torch { facing, lit: true };
        let _ = sim.set_block_state(pos, next, UpdateFlags::ALL);
        notify::update_neighbors_of(sim, pos.above());
    }
}
