//! The scheduled tick queue: per-tick, priority-ordered deferred work.
//!
//! Every block transition is deferred through this queue rather than
//! applied inline. Entries are totally ordered by
//! `(due-tick, priority, insertion-sequence)`, which makes the firing
//! order within one simulation step deterministic and reproducible.
//!
//! Two invariants are enforced structurally rather than left to callers:
//!
//! - Delays are clamped to at least 1, so a callback can never schedule
//!   work into the tick currently being executed.
//! - Scheduling an entry equivalent to one already pending for the same
//!   due tick is a no-op, so a position can never fire twice for the
//!   same kind in one step.

use std::collections::BTreeSet;

use pulse_types::{BlockKind, BlockPos, TickPriority};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// One pending deferred firing.
///
/// The derived ordering compares fields top to bottom, so the field
/// order here *is* the drain order: due tick, then priority, then
/// insertion sequence.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ScheduledTick {
    /// The tick this entry fires on.
    pub due_tick: u64,
    /// Drain priority within the due tick.
    pub priority: TickPriority,
    /// Insertion sequence, unique per queue, breaking remaining ties.
    pub seq: u64,
    /// The cell to fire at.
    pub pos: BlockPos,
    /// The kind the cell must still hold at fire time.
    pub kind: BlockKind,
}

/// Priority queue of deferred block firings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickQueue {
    /// Pending entries in drain order.
    pending: BTreeSet<ScheduledTick>,
    /// Identity index for duplicate and presence checks.
    keys: BTreeSet<(BlockPos, BlockKind, u64)>,
    /// Next insertion sequence number.
    next_seq: u64,
}

impl TickQueue {
    /// Create an empty queue.
    pub const fn new() -> Self {
        Self {
            pending: BTreeSet::new(),
            keys: BTreeSet::new(),
            next_seq: 0,
        }
    }

    /// Enqueue a firing for `pos`/`kind` at `now + delay` (delay clamped
    /// to at least 1).
    ///
    /// Returns `false` if an equivalent entry is already pending for that
    /// due tick; the queue is left unchanged in that case.
    pub fn schedule(
        &mut self,
        pos: BlockPos,
        kind: BlockKind,
        now: u64,
        delay: u64,
        priority: TickPriority,
    ) -> bool {
        let due_tick = now.saturating_add(delay.max(1));
        if !self.keys.insert((pos, kind, due_tick)) {
            trace!(%pos, %kind, due_tick, "duplicate schedule ignored");
            return false;
        }
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.pending.insert(ScheduledTick {
            due_tick,
            priority,
            seq,
            pos,
            kind,
        });
        trace!(%pos, %kind, due_tick, %priority, "tick scheduled");
        true
    }

    /// Whether any entry is pending for `pos`/`kind`, at any due tick.
    pub fn has_scheduled(&self, pos: BlockPos, kind: BlockKind) -> bool {
        self.keys
            .range((pos, kind, 0)..=(pos, kind, u64::MAX))
            .next()
            .is_some()
    }

    /// The due ticks of all pending entries for `pos`/`kind`, ascending.
    pub fn scheduled_due_ticks(&self, pos: BlockPos, kind: BlockKind) -> Vec<u64> {
        self.keys
            .range((pos, kind, 0)..=(pos, kind, u64::MAX))
            .map(|&(_, _, due)| due)
            .collect()
    }

    /// Remove and return every entry due at or before `now`, in drain
    /// order.
    pub fn drain_due(&mut self, now: u64) -> Vec<ScheduledTick> {
        let mut due = Vec::new();
        while let Some(first) = self.pending.first().copied() {
            if first.due_tick > now {
                break;
            }
            self.pending.remove(&first);
            self.keys.remove(&(first.pos, first.kind, first.due_tick));
            due.push(first);
        }
        due
    }

    /// Number of pending entries.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether the queue has no pending entries.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
