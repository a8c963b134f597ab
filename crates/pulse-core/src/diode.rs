//! The generic diode state machine: a delayed on/off latch shared by all
//! repeater-like blocks.
//!
//! The four conceptual states are UNPOWERED, PENDING-ON, POWERED, and
//! PENDING-OFF. The pending states are not stored anywhere -- a block is
//! "pending" exactly while a scheduled event for it is live in the tick
//! queue.
//!
//! Kind-specific behavior is supplied through the [`DiodeBehavior`]
//! capability interface rather than an inheritance chain: each block
//! kind implements delay, turn-on evaluation, locking, and output
//! strength, and the transition logic here stays generic.

use pulse_types::{BlockKind, BlockPos, BlockState, MAX_SIGNAL, TickPriority};
use tracing::debug;

use crate::engine::{Simulation, UpdateFlags};
use crate::notify;

/// Per-kind capabilities of a diode-like block.
pub trait DiodeBehavior {
    /// The kind this behavior drives.
    fn kind(&self) -> BlockKind;

    /// Transition delay in ticks for the given state.
    fn delay(&self, state: BlockState) -> u64;

    /// Whether the block's inputs currently ask for the output to be on.
    fn should_turn_on(&self, sim: &Simulation, pos: BlockPos, state: BlockState) -> bool;

    /// Whether a side input is holding the block frozen.
    fn is_locked(&self, sim: &Simulation, pos: BlockPos, state: BlockState) -> bool {
        let _ = (sim, pos, state);
        false
    }

    /// Output strength while powered.
    fn output_signal(&self, sim: &Simulation, pos: BlockPos, state: BlockState) -> u8 {
        let _ = (sim, pos, state);
        MAX_SIGNAL
    }
}

/// React to a neighbor change: if the desired output differs from the
/// current one and no firing is imminent, schedule a transition.
///
/// The priority is chosen by the tie-break rule that lets a chain of
/// dependent diodes settle upstream-first within a single step (see
/// [`tick_priority`]).
pub(crate) fn check_on_neighbor(
    sim: &mut Simulation,
    behavior: &dyn DiodeBehavior,
    pos: BlockPos,
) {
    let state = sim.grid().state(pos);
    if state.kind() != behavior.kind() || behavior.is_locked(sim, pos, state) {
        return;
    }
    let powered = state.is_powered();
    let desired = behavior.should_turn_on(sim, pos, state);
    if desired != powered && !sim.will_fire_this_tick(pos, behavior.kind()) {
        let priority = tick_priority(sim, pos, state, powered);
        debug!(%pos, kind = %behavior.kind(), desired, %priority, "transition scheduled");
        sim.schedule(pos, behavior.kind(), behavior.delay(state), priority);
    }
}

/// Fire a scheduled transition: recompute the desired output fresh and
/// flip the powered flag to match, fanning out toward the front.
///
/// If the inputs flipped back while the event was pending, the desired
/// output no longer differs and nothing happens -- a sub-delay flicker
/// on the input does not amplify into one on the output.
pub(crate) fn fire(sim: &mut Simulation, behavior: &dyn DiodeBehavior, pos: BlockPos) {
    let state = sim.grid().state(pos);
    if state.kind() != behavior.kind() || behavior.is_locked(sim, pos, state) {
        return;
    }
    let powered = state.is_powered();
    let desired = behavior.should_turn_on(sim, pos, state);
    if desired == powered {
        return;
    }
    let next = state.with_powered(desired);
    let _ = sim.set_block_state(pos, next, UpdateFlags::OBSERVERS_ONLY);
    notify::update_neighbors_in_front(sim, pos, next);
}

/// The tie-break priority rule.
///
/// If the neighbor on the output side is itself a diode that is not
/// pointing back at this block, escalate to extremely-high so the
/// upstream block commits before its consumer re-evaluates within the
/// same step. Otherwise a turn-off runs at very-high and a turn-on at
/// high.
pub(crate) fn tick_priority(
    sim: &Simulation,
    pos: BlockPos,
    state: BlockState,
    currently_powered: bool,
) -> TickPriority {
    if feeds_another_diode(sim, pos, state) {
        TickPriority::ExtremelyHigh
    } else if currently_powered {
        TickPriority::VeryHigh
    } else {
        TickPriority::High
    }
}

/// Whether the cell on the output side holds a diode that is not
/// pointing back at this block.
fn feeds_another_diode(sim: &Simulation, pos: BlockPos, state: BlockState) -> bool {
    let Some(facing) = state.facing() else {
        return false;
    };
    let front_dir = facing.opposite();
    let front = sim.grid().state(pos.relative(front_dir));
    front.is_diode() && front.facing() != Some(front_dir)
}
