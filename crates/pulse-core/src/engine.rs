//! The simulation engine: grid, queue, guard, and update dispatch
//! composed into one run-to-completion instance.
//!
//! # Control flow
//!
//! An external edit or a fired scheduled event replaces a cell. The
//! write enqueues neighbor-change commands (with orientation metadata)
//! and observer triggers onto an explicit update queue, which is drained
//! breadth-first before control returns to the caller. Handlers react by
//! scheduling future ticks -- never by mutating inline -- so call depth
//! stays bounded by one frame regardless of fan-out, and the traversal
//! order is auditable.
//!
//! # Determinism
//!
//! All collections iterate in a fixed order, the update queue is FIFO,
//! and the tick queue drains in `(due, priority, sequence)` order. Given
//! an identical sequence of host operations, two instances produce
//! identical grids, summaries, and event streams.

use std::collections::{BTreeSet, VecDeque};

use pulse_types::{
    BlockKind, BlockPos, BlockState, Direction, EngineEvent, Orientation, TickPriority,
};
use pulse_world::Grid;
use serde::Serialize;
use tracing::debug;

use crate::error::EngineError;
use crate::guard::ToggleHistory;
use crate::scheduler::{ScheduledTick, TickQueue};
use crate::{button, comparator, diode, lamp, lever, notify, observer, repeater, torch};

/// What a state write should fan out to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateFlags {
    /// Enqueue neighbor-change commands for the six adjacent cells.
    pub notify_neighbors: bool,
    /// Trigger observers watching the written cell.
    pub trigger_observers: bool,
}

impl UpdateFlags {
    /// Notify neighbors and trigger observers.
    pub const ALL: Self = Self {
        notify_neighbors: true,
        trigger_observers: true,
    };
    /// Trigger observers only; the writer handles its own directed
    /// fan-out.
    pub const OBSERVERS_ONLY: Self = Self {
        notify_neighbors: false,
        trigger_observers: true,
    };
}

/// A queued follow-up command produced by a state write.
#[derive(Debug, Clone, Copy)]
enum Update {
    /// A neighbor of `origin` changed; re-evaluate the block at `pos`.
    NeighborChanged {
        /// The cell to re-evaluate.
        pos: BlockPos,
        /// The cell whose change caused this notification.
        origin: BlockPos,
        /// Directional metadata, when the fan-out was directed.
        orientation: Option<Orientation>,
    },
    /// The cell an observer watches changed.
    ObservedChanged {
        /// The observer's own position.
        pos: BlockPos,
    },
}

/// Summary of one executed simulation step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Events that fired, in execution order.
    pub fired: Vec<ScheduledTick>,
    /// Events discarded because their cell's kind changed before firing.
    pub discarded: u32,
    /// Neighbor-update commands processed during the step.
    pub updates: u32,
    /// Cell states replaced during the step.
    pub changed: u32,
}

/// One independent simulation instance.
///
/// Owns the grid, the scheduled tick queue, the toggle history, and the
/// observable-event outbox. Nothing here is shared across instances, so
/// multiple simulations can run side by side without interfering.
#[derive(Debug, Default)]
pub struct Simulation {
    /// Cell storage and side tables.
    grid: Grid,
    /// Deferred block firings.
    queue: TickQueue,
    /// Recent-flip history for the toggle-storm guard.
    toggles: ToggleHistory,
    /// Current tick number; advances once per host step.
    tick: u64,
    /// Pending update commands, drained breadth-first.
    pending: VecDeque<Update>,
    /// Entries of the in-progress drain pass that have not fired yet.
    firing_now: BTreeSet<(BlockPos, BlockKind)>,
    /// Observable side effects awaiting collection by the host.
    events: Vec<EngineEvent>,
    /// State writes since the start of the current step.
    writes_this_step: u32,
}

impl Simulation {
    /// Create an empty simulation at tick 0.
    pub const fn new() -> Self {
        Self {
            grid: Grid::new(),
            queue: TickQueue::new(),
            toggles: ToggleHistory::new(),
            tick: 0,
            pending: VecDeque::new(),
            firing_now: BTreeSet::new(),
            events: Vec::new(),
            writes_this_step: 0,
        }
    }

    /// The current tick number.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Read access to the grid.
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Read access to the scheduled tick queue.
    pub const fn queue(&self) -> &TickQueue {
        &self.queue
    }

    /// Drain the observable side-effect outbox.
    ///
    /// The host is expected to call this after each operation; events
    /// accumulate until collected.
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        core::mem::take(&mut self.events)
    }

    // -------------------------------------------------------------------
    // External edits
    // -------------------------------------------------------------------

    /// Replace the cell at `pos`, fanning change notifications out to its
    /// neighbors and re-evaluating the placed block itself.
    ///
    /// Replacing a powered logic block issues one final directed fan-out
    /// on its behalf so downstream consumers settle; any events still
    /// scheduled for the old kind become stale and are discarded when
    /// due.
    pub fn set_block(&mut self, pos: BlockPos, state: BlockState) {
        let old = self.grid.state(pos);
        if !self.set_block_state(pos, state, UpdateFlags::ALL) {
            return;
        }
        if old.kind() != state.kind() && old.is_powered() {
            match old {
                BlockState::Repeater { .. }
                | BlockState::Comparator { .. }
                | BlockState::Observer { .. } => {
                    notify::update_neighbors_in_front(self, pos, old);
                }
                BlockState::Button { facing, .. } | BlockState::Lever { facing, .. } => {
                    notify::update_attached_neighbors(self, pos, facing);
                }
                // The generic neighbor ring above already covers these.
                BlockState::Air
                | BlockState::Conductor
                | BlockState::PowerSource { .. }
                | BlockState::Torch { .. }
                | BlockState::Lamp { .. } => {}
            }
        }
        // The placed block evaluates its own surroundings once.
        self.pending.push_back(Update::NeighborChanged {
            pos,
            origin: pos,
            orientation: None,
        });
        let _ = self.drain_updates();
    }

    /// Set or clear the analog value a container-like collaborator
    /// exposes at `pos`, re-checking any comparator reading the cell
    /// directly or through one signal-transparent cell.
    pub fn set_analog_source(&mut self, pos: BlockPos, value: Option<u8>) {
        if !self.grid.set_analog_source(pos, value) {
            return;
        }
        for dir in Direction::ALL {
            let near = pos.relative(dir);
            match self.grid.state(near) {
                BlockState::Comparator { .. } => {
                    self.pending.push_back(Update::NeighborChanged {
                        pos: near,
                        origin: pos,
                        orientation: None,
                    });
                }
                BlockState::Conductor => {
                    let far = near.relative(dir);
                    if self.grid.kind(far) == BlockKind::Comparator {
                        self.pending.push_back(Update::NeighborChanged {
                            pos: far,
                            origin: pos,
                            orientation: None,
                        });
                    }
                }
                BlockState::Air
                | BlockState::PowerSource { .. }
                | BlockState::Repeater { .. }
                | BlockState::Torch { .. }
                | BlockState::Observer { .. }
                | BlockState::Button { .. }
                | BlockState::Lever { .. }
                | BlockState::Lamp { .. } => {}
            }
        }
        let _ = self.drain_updates();
    }

    // -------------------------------------------------------------------
    // User operations
    // -------------------------------------------------------------------

    /// Press the button at `pos`. Pressing an already-pressed button is a
    /// harmless no-op.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::WrongKind`] if the cell is not a button.
    pub fn press_button(&mut self, pos: BlockPos) -> Result<(), EngineError> {
        self.expect_kind(pos, BlockKind::Button)?;
        button::press(self, pos);
        let _ = self.drain_updates();
        Ok(())
    }

    /// Flip the lever at `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::WrongKind`] if the cell is not a lever.
    pub fn toggle_lever(&mut self, pos: BlockPos) -> Result<(), EngineError> {
        self.expect_kind(pos, BlockKind::Lever)?;
        lever::toggle(self, pos);
        let _ = self.drain_updates();
        Ok(())
    }

    /// Switch the comparator at `pos` between compare and subtract mode
    /// and schedule a verification tick.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::WrongKind`] if the cell is not a comparator.
    pub fn toggle_comparator_mode(&mut self, pos: BlockPos) -> Result<(), EngineError> {
        self.expect_kind(pos, BlockKind::Comparator)?;
        comparator::toggle_mode(self, pos);
        let _ = self.drain_updates();
        Ok(())
    }

    fn expect_kind(&self, pos: BlockPos, expected: BlockKind) -> Result<(), EngineError> {
        let found = self.grid.kind(pos);
        if found == expected {
            Ok(())
        } else {
            Err(EngineError::WrongKind {
                pos,
                expected,
                found,
            })
        }
    }

    // -------------------------------------------------------------------
    // Host clock
    // -------------------------------------------------------------------

    /// Execute one simulation step: advance the tick counter, then fire
    /// every due scheduled event in `(due, priority, sequence)` order.
    ///
    /// Each event's follow-up notifications drain before the next event
    /// fires, so later events observe earlier events' committed state.
    /// Events whose cell no longer holds the scheduled kind are silently
    /// discarded.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::TickOverflow`] if the tick counter is
    /// exhausted.
    pub fn advance_tick(&mut self) -> Result<TickSummary, EngineError> {
        self.tick = self
            .tick
            .checked_add(1)
            .ok_or(EngineError::TickOverflow)?;
        self.writes_this_step = 0;
        let mut updates = 0u32;

        let due = self.queue.drain_due(self.tick);
        self.firing_now = due.iter().map(|event| (event.pos, event.kind)).collect();

        let mut fired = Vec::new();
        let mut discarded = 0u32;
        for event in due {
            self.firing_now.remove(&(event.pos, event.kind));
            if self.grid.kind(event.pos) != event.kind {
                // The cell was removed or replaced since scheduling.
                discarded = discarded.saturating_add(1);
                debug!(pos = %event.pos, kind = %event.kind, "stale event discarded");
                continue;
            }
            self.fire(event);
            updates = updates.saturating_add(self.drain_updates());
            fired.push(event);
        }
        self.firing_now.clear();

        let summary = TickSummary {
            tick: self.tick,
            fired,
            discarded,
            updates,
            changed: self.writes_this_step,
        };
        debug!(
            tick = summary.tick,
            fired = summary.fired.len(),
            discarded = summary.discarded,
            changed = summary.changed,
            "tick advanced"
        );
        Ok(summary)
    }

    fn fire(&mut self, event: ScheduledTick) {
        match event.kind {
            BlockKind::Repeater => {
                diode::fire(self, &repeater::RepeaterBehavior, event.pos);
            }
            BlockKind::Comparator => comparator::fire(self, event.pos),
            BlockKind::Torch => torch::fire(self, event.pos),
            BlockKind::Observer => observer::fire(self, event.pos),
            BlockKind::Button => button::fire(self, event.pos),
            BlockKind::Lamp => lamp::fire(self, event.pos),
            // These kinds never schedule work for themselves.
            BlockKind::Air
            | BlockKind::Conductor
            | BlockKind::PowerSource
            | BlockKind::Lever => {}
        }
    }

    // -------------------------------------------------------------------
    // Internal plumbing for block handlers
    // -------------------------------------------------------------------

    /// Replace a cell's state, enqueueing the fan-out the flags ask for.
    /// Returns `false` if the write was a no-op.
    pub(crate) fn set_block_state(
        &mut self,
        pos: BlockPos,
        state: BlockState,
        flags: UpdateFlags,
    ) -> bool {
        if !self.grid.set(pos, state) {
            return false;
        }
        self.writes_this_step = self.writes_this_step.saturating_add(1);
        self.events.push(EngineEvent::BlockChanged { pos });
        if flags.trigger_observers {
            self.trigger_watching_observers(pos);
        }
        if flags.notify_neighbors {
            for dir in Direction::ALL {
                self.pending.push_back(Update::NeighborChanged {
                    pos: pos.relative(dir),
                    origin: pos,
                    orientation: None,
                });
            }
        }
        true
    }

    /// Enqueue a single directed neighbor-change command.
    pub(crate) fn enqueue_neighbor_changed(
        &mut self,
        pos: BlockPos,
        origin: BlockPos,
        orientation: Option<Orientation>,
    ) {
        self.pending.push_back(Update::NeighborChanged {
            pos,
            origin,
            orientation,
        });
    }

    /// Schedule a deferred firing for `pos`/`kind` relative to the
    /// current tick.
    pub(crate) fn schedule(
        &mut self,
        pos: BlockPos,
        kind: BlockKind,
        delay: u64,
        priority: TickPriority,
    ) {
        let _ = self.queue.schedule(pos, kind, self.tick, delay, priority);
    }

    /// Whether an event for `pos`/`kind` is collected but not yet fired
    /// in the in-progress step.
    pub(crate) fn will_fire_this_tick(&self, pos: BlockPos, kind: BlockKind) -> bool {
        self.firing_now.contains(&(pos, kind))
    }

    /// Consult (and optionally extend) the toggle-storm history for `pos`.
    pub(crate) fn guard_check(&mut self, pos: BlockPos, log_toggle: bool) -> bool {
        self.toggles
            .is_toggled_too_frequently(self.tick, pos, log_toggle)
    }

    /// Record an observable side effect for the host.
    pub(crate) fn push_event(&mut self, event: EngineEvent) {
        self.events.push(event);
    }

    /// Replace a comparator's cached numeric output.
    pub(crate) fn set_comparator_output(&mut self, pos: BlockPos, value: u8) {
        self.grid.set_comparator_output(pos, value);
    }

    /// Drain the update queue, dispatching each command to the affected
    /// block's handler. Returns the number of commands processed.
    fn drain_updates(&mut self) -> u32 {
        let mut processed = 0u32;
        while let Some(update) = self.pending.pop_front() {
            processed = processed.saturating_add(1);
            match update {
                Update::NeighborChanged {
                    pos,
                    origin,
                    orientation,
                } => self.dispatch_neighbor_changed(pos, origin, orientation),
                Update::ObservedChanged { pos } => observer::on_observed_changed(self, pos),
            }
        }
        processed
    }

    fn dispatch_neighbor_changed(
        &mut self,
        pos: BlockPos,
        origin: BlockPos,
        orientation: Option<Orientation>,
    ) {
        if let Some(orientation) = orientation {
            debug!(%pos, %origin, %orientation, "neighbor changed");
        }
        match self.grid.state(pos) {
            // Passive cells and sources do not react to neighbor changes;
            // observers react only to their watched cell.
            BlockState::Air
            | BlockState::Conductor
            | BlockState::PowerSource { .. }
            | BlockState::Observer { .. }
            | BlockState::Button { .. }
            | BlockState::Lever { .. } => {}
            BlockState::Repeater { .. } => repeater::on_neighbor_changed(self, pos),
            BlockState::Comparator { .. } => comparator::check_on_neighbor(self, pos),
            BlockState::Torch { .. } => torch::on_neighbor_changed(self, pos),
            BlockState::Lamp { .. } => lamp::on_neighbor_changed(self, pos),
        }
    }

    /// Trigger every observer whose watched cell is `pos`.
    fn trigger_watching_observers(&mut self, pos: BlockPos) {
        for dir in Direction::ALL {
            let observer_pos = pos.relative(dir);
            if let BlockState::Observer { facing, .. } = self.grid.state(observer_pos)
                && facing == dir.opposite()
            {
                self.pending
                    .push_back(Update::ObservedChanged { pos: observer_pos });
            }
        }
    }
}
