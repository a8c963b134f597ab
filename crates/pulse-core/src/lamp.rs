//! The lamp: a weak-signal consumer that lights immediately and goes
//! dark after a short delay.
//!
//! The asymmetric timing keeps fast pulse trains visible: a lamp fed a
//! one-tick pulse stays lit for the off delay instead of flickering
//! sub-tick.

use pulse_types::{BlockKind, BlockPos, BlockState, TickPriority};
use pulse_world::signal;

use crate::engine::{Simulation, UpdateFlags};

/// Delay before an unpowered lamp goes dark, in ticks.
pub const LAMP_OFF_DELAY_TICKS: u64 = 2;

/// React to a neighbor change: light up at once, or schedule the dark
/// transition.
pub(crate) fn on_neighbor_changed(sim: &mut Simulation, pos: BlockPos) {
    let BlockState::Lamp { lit } = sim.grid().state(pos) else {
        return;
    };
    let powered = signal::has_neighbor_signal(sim.grid(), pos);
    if lit && !powered {
        if !sim.queue().has_scheduled(pos, BlockKind::Lamp) {
            sim.schedule(pos, BlockKind::Lamp, LAMP_OFF_DELAY_TICKS, TickPriority::Normal);
        }
    } else if !lit && powered {
        let _ = sim.set_block_state(
            pos,
            BlockState::Lamp { lit: true },
            UpdateFlags::OBSERVERS_ONLY,
        );
    }
}

/// Fire the scheduled dark transition, re-checking the inputs first.
pub(crate) fn fire(sim: &mut Simulation, pos: BlockPos) {
    let BlockState::Lamp { lit } = sim.grid().state(pos) else {
        return;
    };
    if lit && !signal::has_neighbor_signal(sim.grid(), pos) {
        let _ = sim.set_block_state(
            pos,
            BlockState::Lamp { lit: false },
            UpdateFlags::OBSERVERS_ONLY,
        );
    }
}
