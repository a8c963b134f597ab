//! The toggle-storm guard: a rate limiter for self-oscillating blocks.
//!
//! Torch- and observer-style blocks log a [`ToggleRecord`] on each flip.
//! When a single position accumulates [`TOGGLE_TRIP_COUNT`] live records
//! inside the [`TOGGLE_WINDOW_TICKS`] window, the guard trips: the
//! calling block freezes itself, emits a burnout event, and schedules a
//! recovery re-check [`BURNOUT_RECOVERY_TICKS`] later. The guard never
//! resets its counter on trip -- records aging out of the window is the
//! only way the count comes back down.
//!
//! The history is owned by each simulation instance and passed by
//! reference, so concurrent simulations never interfere. It is pruned on
//! every check and therefore never grows unboundedly.
//!
//! Timing here is in simulation ticks, matching the scheduler. A host
//! that changes its tick rate changes the effective storm window too;
//! the three constants below are the single place to retune.

use std::collections::VecDeque;

use pulse_types::BlockPos;
use tracing::warn;

/// Width of the sliding window a storm is measured over, in ticks.
pub const TOGGLE_WINDOW_TICKS: u64 = 60;

/// Number of live records for one position that trips the guard.
pub const TOGGLE_TRIP_COUNT: usize = 8;

/// Cooldown before a tripped block re-checks its state, in ticks.
pub const BURNOUT_RECOVERY_TICKS: u64 = 160;

/// One logged flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleRecord {
    /// The flipped cell.
    pub pos: BlockPos,
    /// The tick the flip happened on.
    pub tick: u64,
}

/// Per-simulation history of recent block flips.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToggleHistory {
    /// Records in insertion order; pruned from the front as they age out.
    records: VecDeque<ToggleRecord>,
}

impl ToggleHistory {
    /// Create an empty history.
    pub const fn new() -> Self {
        Self {
            records: VecDeque::new(),
        }
    }

    /// Check whether `pos` is flipping too frequently as of `now`.
    ///
    /// Records older than the window are pruned first. If `log_toggle`
    /// is set, a new record for `pos` at `now` is appended before
    /// counting. Returns `true` when the live count for `pos` reaches
    /// the trip threshold.
    pub fn is_toggled_too_frequently(
        &mut self,
        now: u64,
        pos: BlockPos,
        log_toggle: bool,
    ) -> bool {
        self.records
            .retain(|record| now.saturating_sub(record.tick) <= TOGGLE_WINDOW_TICKS);
        if log_toggle {
            self.records.push_back(ToggleRecord { pos, tick: now });
        }
        let live = self
            .records
            .iter()
            .filter(|record| record.pos == pos)
            .count();
        let tripped = live >= TOGGLE_TRIP_COUNT;
        if tripped {
            warn!(%pos, live, now, "toggle storm detected");
        }
        tripped
    }

    /// Number of live records across all positions.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the history holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(x: i32) -> BlockPos {
        BlockPos::new(x, 0, 0)
    }

    #[test]
    fn trips_at_eight_flips_inside_the_window() {
        let mut history = ToggleHistory::new();
        for tick in 0..7 {
            assert!(!history.is_toggled_too_frequently(tick, pos(0), true));
        }
        assert!(history.is_toggled_too_frequently(7, pos(0), true));
    }

    #[test]
    fn old_records_age_out() {
        let mut history = ToggleHistory::new();
        for tick in 0..7 {
            let _ = history.is_toggled_too_frequently(tick, pos(0), true);
        }
        // 70 ticks later the early records are gone; this is flip 1 of a
        // fresh window, not flip 8.
        assert!(!history.is_toggled_too_frequently(70, pos(0), true));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn counting_is_per_position() {
        let mut history = ToggleHistory::new();
        for tick in 0..7 {
            let _ = history.is_toggled_too_frequently(tick, pos(0), true);
            let _ = history.is_toggled_too_frequently(tick, pos(1), true);
        }
        // Seven flips each: neither position has tripped yet.
        assert!(!history.is_toggled_too_frequently(8, pos(2), false));
        assert!(history.is_toggled_too_frequently(8, pos(0), true));
    }

    #[test]
    fn check_without_logging_does_not_extend_the_storm() {
        let mut history = ToggleHistory::new();
        for tick in 0..8 {
            let _ = history.is_toggled_too_frequently(tick, pos(0), true);
        }
        // Repeated probing keeps reporting the trip but adds nothing.
        assert!(history.is_toggled_too_frequently(9, pos(0), false));
        assert_eq!(history.len(), 8);
        // Once the window passes, the probe comes back clean.
        assert!(!history.is_toggled_too_frequently(200, pos(0), false));
        assert!(history.is_empty());
    }

    #[test]
    fn window_boundary_is_inclusive() {
        let mut history = ToggleHistory::new();
        let _ = history.is_toggled_too_frequently(0, pos(0), true);
        // Exactly at the window edge the record is still live.
        let _ = history.is_toggled_too_frequently(TOGGLE_WINDOW_TICKS, pos(0), false);
        assert_eq!(history.len(), 1);
        // One past the edge it is pruned.
        let _ = history.is_toggled_too_frequently(
            TOGGLE_WINDOW_TICKS.saturating_add(1),
            pos(0),
            false,
        );
        assert!(history.is_empty());
    }
}
