//! The lever: a latching source toggled by the host.

use pulse_types::{BlockPos, BlockState, EngineEvent};
use tracing::debug;

use crate::engine::{Simulation, UpdateFlags};
use crate::notify;

/// Flip the lever's on/off state.
pub(crate) fn toggle(sim: &mut Simulation, pos: BlockPos) {
    let BlockState::Lever { facing, powered } = sim.grid().state(pos) else {
        return;
    };
    let next = BlockState::Lever {
        facing,
        powered: !powered,
    };
    let _ = sim.set_block_state(pos, next, UpdateFlags::OBSERVERS_ONLY);
    sim.push_event(EngineEvent::Click {
        pos,
        activated: !powered,
    });
    notify::update_attached_neighbors(sim, pos, facing);
    debug!(%pos, on = !powered, "lever toggled");
}
