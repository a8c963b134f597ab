//! The grid: a sparse cell store plus the side tables the signal layer
//! reads.
//!
//! The [`Grid`] is pure storage. It answers "what is at this position"
//! and records writes; notification fan-out, scheduling, and transition
//! logic all live above it in `pulse-core`. Cells not present in the map
//! are [`BlockState::Air`].
//!
//! Two side tables ride along with the cells:
//!
//! - **analog sources** -- externally injected `0..=15` values exposed by
//!   container-like collaborators; the comparator's main input probes
//!   them through a signal-transparent cell.
//! - **comparator outputs** -- the comparator's cached numeric output,
//!   stored separately from its boolean powered flag so arithmetic
//!   circuits can read the value rather than just on/off.

use std::collections::BTreeMap;

use pulse_types::{BlockKind, BlockPos, BlockState, MAX_SIGNAL};
use tracing::trace;

/// Sparse block storage with deterministic iteration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Grid {
    /// Occupied cells; absent keys are air.
    cells: BTreeMap<BlockPos, BlockState>,
    /// Externally injected analog values (container fullness and the like).
    analog_sources: BTreeMap<BlockPos, u8>,
    /// Cached comparator output values.
    comparator_outputs: BTreeMap<BlockPos, u8>,
}

impl Grid {
    /// Create an empty grid.
    pub const fn new() -> Self {
        Self {
            cells: BTreeMap::new(),
            analog_sources: BTreeMap::new(),
            comparator_outputs: BTreeMap::new(),
        }
    }

    /// Return the state at a position (air for unoccupied cells).
    pub fn state(&self, pos: BlockPos) -> BlockState {
        self.cells.get(&pos).copied().unwrap_or(BlockState::Air)
    }

    /// Return the kind tag at a position.
    pub fn kind(&self, pos: BlockPos) -> BlockKind {
        self.state(pos).kind()
    }

    /// Replace the state at a position. Returns `true` if the stored
    /// value changed.
    ///
    /// Writing [`BlockState::Air`] removes the cell. A write that changes
    /// the cell's kind away from comparator drops any cached output for
    /// that position.
    pub fn set(&mut self, pos: BlockPos, state: BlockState) -> bool {
        let previous = self.state(pos);
        if previous == state {
            return false;
        }
        if state.is_air() {
            self.cells.remove(&pos);
        } else {
            self.cells.insert(pos, state);
        }
        if state.kind() != BlockKind::Comparator {
            self.comparator_outputs.remove(&pos);
        }
        trace!(%pos, from = %previous.kind(), to = %state.kind(), "cell replaced");
        true
    }

    /// Remove the cell at a position. Returns `true` if it was occupied.
    pub fn remove(&mut self, pos: BlockPos) -> bool {
        self.set(pos, BlockState::Air)
    }

    /// Number of occupied cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Iterate over occupied cells in position order.
    pub fn cells(&self) -> impl Iterator<Item = (&BlockPos, &BlockState)> {
        self.cells.iter()
    }

    // -------------------------------------------------------------------
    // Analog sources
    // -------------------------------------------------------------------

    /// The externally injected analog value at a position, if any.
    pub fn analog_source(&self, pos: BlockPos) -> Option<u8> {
        self.analog_sources.get(&pos).copied()
    }

    /// Set or clear the analog value exposed at a position. Values are
    /// clamped to `0..=15`. Returns `true` if the stored value changed.
    pub fn set_analog_source(&mut self, pos: BlockPos, value: Option<u8>) -> bool {
        let clamped = value.map(|v| v.min(MAX_SIGNAL));
        if self.analog_source(pos) == clamped {
            return false;
        }
        match clamped {
            Some(v) => {
                self.analog_sources.insert(pos, v);
            }
            None => {
                self.analog_sources.remove(&pos);
            }
        }
        true
    }

    // -------------------------------------------------------------------
    // Comparator output cache
    // -------------------------------------------------------------------

    /// The cached comparator output at a position (0 when absent).
    pub fn comparator_output(&self, pos: BlockPos) -> u8 {
        self.comparator_outputs.get(&pos).copied().unwrap_or(0)
    }

    /// Replace the cached comparator output at a position.
    pub fn set_comparator_output(&mut self, pos: BlockPos, value: u8) {
        let value = value.min(MAX_SIGNAL);
        if value == 0 {
            self.comparator_outputs.remove(&pos);
        } else {
            self.comparator_outputs.insert(pos, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use pulse_types::Direction;

    use super::*;

    #[test]
    fn empty_cells_read_as_air() {
        let grid = Grid::new();
        assert_eq!(grid.state(BlockPos::ORIGIN), BlockState::Air);
        assert_eq!(grid.kind(BlockPos::ORIGIN), BlockKind::Air);
        assert_eq!(grid.cell_count(), 0);
    }

    #[test]
    fn set_reports_change() {
        let mut grid = Grid::new();
        let pos = BlockPos::new(1, 0, 0);
        assert!(grid.set(pos, BlockState::Conductor));
        assert!(!grid.set(pos, BlockState::Conductor));
        assert_eq!(grid.cell_count(), 1);
    }

    #[test]
    fn writing_air_removes_the_cell() {
        let mut grid = Grid::new();
        let pos = BlockPos::new(0, 2, 0);
        let _ = grid.set(pos, BlockState::lever(Direction::Up));
        assert!(grid.remove(pos));
        assert_eq!(grid.cell_count(), 0);
        assert!(!grid.remove(pos));
    }

    #[test]
    fn replacing_a_comparator_drops_its_cache() {
        let mut grid = Grid::new();
        let pos = BlockPos::ORIGIN;
        let _ = grid.set(
            pos,
            BlockState::comparator(Direction::West, pulse_types::ComparatorMode::Compare),
        );
        grid.set_comparator_output(pos, 9);
        assert_eq!(grid.comparator_output(pos), 9);

        let _ = grid.set(pos, BlockState::Conductor);
        assert_eq!(grid.comparator_output(pos), 0);
    }

    #[test]
    fn analog_sources_clamp_and_clear() {
        let mut grid = Grid::new();
        let pos = BlockPos::new(5, 5, 5);
        assert!(grid.set_analog_source(pos, Some(99)));
        assert_eq!(grid.analog_source(pos), Some(15));
        assert!(!grid.set_analog_source(pos, Some(15)));
        assert!(grid.set_analog_source(pos, None));
        assert_eq!(grid.analog_source(pos), None);
    }

    #[test]
    fn cells_iterate_in_position_order() {
        let mut grid = Grid::new();
        let _ = grid.set(BlockPos::new(2, 0, 0), BlockState::Conductor);
        let _ = grid.set(BlockPos::new(-1, 0, 0), BlockState::Conductor);
        let _ = grid.set(BlockPos::new(0, 5, 0), BlockState::Conductor);

        let order: Vec<BlockPos> = grid.cells().map(|(pos, _)| *pos).collect();
        let mut sorted = order.clone();
        sorted.sort();
        assert_eq!(order, sorted);
        assert_eq!(order.len(), 3);
    }

    #[test]
    fn grid_roundtrip_serde() {
        let mut grid = Grid::new();
        let _ = grid.set(BlockPos::new(0, 0, 0), BlockState::torch(Direction::Up));
        let _ = grid.set(BlockPos::new(1, 0, 0), BlockState::Conductor);
        let json = serde_json::to_string(&grid).ok();
        assert!(json.is_some());
        let restored: Result<Grid, _> =
            serde_json::from_str(json.as_deref().unwrap_or(""));
        assert_eq!(restored.ok(), Some(grid));
    }
}
