//! The observer: an edge detector that pulses when the cell it faces
//! changes.
//!
//! The observed-change trigger arrives on its own channel (it is driven
//! by state writes, not by neighbor-change notifications), schedules the
//! pulse start, and the pulse end is scheduled from the start's firing.
//! Pulse starts are logged with the toggle-storm guard: an observer
//! wired into a feedback clock trips it like a torch does, swallows the
//! pulse, and re-checks after the recovery cooldown -- so a recovering
//! observer still reports the last change it saw.

use pulse_types::{BlockKind, BlockPos, BlockState, EngineEvent, TickPriority};
use tracing::debug;

use crate::engine::{Simulation, UpdateFlags};
use crate::guard::BURNOUT_RECOVERY_TICKS;
use crate::notify;

/// Pulse length (and trigger delay) in ticks.
pub const OBSERVER_PULSE_TICKS: u64 = 2;

/// React to a change of the observed cell: schedule the pulse start.
pub(crate) fn on_observed_changed(sim: &mut Simulation, pos: BlockPos) {
    let BlockState::Observer { powered, .. } = sim.grid().state(pos) else {
        return;
    };
    if !powered && !sim.queue().has_scheduled(pos, BlockKind::Observer) {
        sim.schedule(
            pos,
            BlockKind::Observer,
            OBSERVER_PULSE_TICKS,
            TickPriority::Normal,
        );
    }
}

/// Fire a scheduled pulse edge: powered observers fall, idle observers
/// rise (guard permitting) and schedule their own falling edge.
pub(crate) fn fire(sim: &mut Simulation, pos: BlockPos) {
    let state = sim.grid().state(pos);
    let BlockState::Observer { facing, powered } = state else {
        return;
    };
    if powered {
        let next = BlockState::Observer {
            facing,
            powered: false,
        };
        let _ = sim.set_block_state(pos, next, UpdateFlags::OBSERVERS_ONLY);
        notify::update_neighbors_in_front(sim, pos, next);
        return;
    }
    if sim.guard_check(pos, true) {
        debug!(%pos, "observer burned out");
        sim.push_event(EngineEvent::Burnout { pos });
        sim.schedule(
            pos,
            BlockKind::Observer,
            BURNOUT_RECOVERY_TICKS,
            TickPriority::Normal,
        );
        return;
    }
    let next = BlockState::Observer {
        facing,
        powered: true,
    };
    let _ = sim.set_block_state(pos, next, UpdateFlags::OBSERVERS_ONLY);
    sim.schedule(
        pos,
        BlockKind::Observer,
        OBSERVER_PULSE_TICKS,
        TickPriority::Normal,
    );
    notify::update_neighbors_in_front(sim, pos, next);
}
