//! The button: a momentary source that releases itself through the
//! queue.

use pulse_types::{BlockKind, BlockPos, BlockState, EngineEvent, TickPriority};
use tracing::debug;

use crate::engine::{Simulation, UpdateFlags};
use crate::notify;

/// How long a press lasts, in ticks.
pub const BUTTON_PRESS_TICKS: u64 = 20;

/// Press the button. A press while already pressed is a harmless no-op;
/// the pending release keeps its original due tick.
pub(crate) fn press(sim: &mut Simulation, pos: BlockPos) {
    let BlockState::Button { facing, powered } = sim.grid().state(pos) else {
        return;
    };
    if powered {
        return;
    }
    let next = BlockState::Button {
        facing,
        powered: true,
    };
    let _ = sim.set_block_state(pos, next, UpdateFlags::OBSERVERS_ONLY);
    sim.push_event(EngineEvent::Click {
        pos,
        activated: true,
    });
    notify::update_attached_neighbors(sim, pos, facing);
    sim.schedule(pos, BlockKind::Button, BUTTON_PRESS_TICKS, TickPriority::Normal);
    debug!(%pos, "button pressed");
}

/// Fire the scheduled release.
pub(crate) fn fire(sim: &mut Simulation, pos: BlockPos) {
    let BlockState::Button { facing, powered } = sim.grid().state(pos) else {
        return;
    };
    if !powered {
        return;
    }
    let next = BlockState::Button {
        facing,
        powered: false,
    };
    let _ = sim.set_block_state(pos, next, UpdateFlags::OBSERVERS_ONLY);
    sim.push_event(EngineEvent::Click {
        pos,
        activated: false,
    });
    notify::update_attached_neighbors(sim, pos, facing);
}
