//! The signal query interface: weak, strong, and side-channel strength
//! lookups over the grid.
//!
//! # Query convention
//!
//! Every lookup takes the direction the query travelled: a block at `q`
//! asking about its neighbor `q.relative(dir)` passes that same `dir`.
//! The queried cell therefore emits back toward `dir.opposite()`.
//!
//! # One-directional contract
//!
//! A diode-like block emits its output strength only toward the single
//! direction opposite its input face; every other face reads 0 from it.
//! Side inputs are read-only probes and never feed back into the same
//! block's own output face. This rule is what prevents trivial one-step
//! feedback loops.

use pulse_types::{BlockPos, BlockState, Direction, MAX_SIGNAL};

use crate::grid::Grid;

/// Which neighbor kinds a side-input probe accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideInputs {
    /// Only diode-like blocks count (repeater locking).
    DiodesOnly,
    /// Diode-like blocks and constant emitters count (comparator side
    /// channel).
    Any,
}

/// Weak signal the cell at `pos` drives back along a query that
/// travelled in `dir`. Readable by any adjacent consumer.
pub fn signal(grid: &Grid, pos: BlockPos, dir: Direction) -> u8 {
    match grid.state(pos) {
        BlockState::Air | BlockState::Lamp { .. } => 0,
        // A conductor relays the strongest direct signal fed into it as
        // weak signal on every face.
        BlockState::Conductor => direct_signal_into(grid, pos),
        BlockState::PowerSource { strength } => strength,
        BlockState::Repeater {
            facing, powered, ..
        }
        | BlockState::Observer { facing, powered } => {
            if powered && dir == facing {
                MAX_SIGNAL
            } else {
                0
            }
        }
        BlockState::Comparator {
            facing, powered, ..
        } => {
            if powered && dir == facing {
                grid.comparator_output(pos)
            } else {
                0
            }
        }
        BlockState::Torch { facing, lit } => {
            // Emits on every face except back into its support cell.
            if lit && dir != facing {
                MAX_SIGNAL
            } else {
                0
            }
        }
        BlockState::Button { powered, .. } | BlockState::Lever { powered, .. } => {
            if powered {
                MAX_SIGNAL
            } else {
                0
            }
        }
    }
}

/// Strong signal the cell at `pos` drives back along a query that
/// travelled in `dir`. Required to directly actuate an output mechanism
/// and to feed a conductor.
pub fn direct_signal(grid: &Grid, pos: BlockPos, dir: Direction) -> u8 {
    match grid.state(pos) {
        BlockState::Air
        | BlockState::Conductor
        | BlockState::Lamp { .. }
        | BlockState::PowerSource { .. } => 0,
        BlockState::Repeater {
            facing, powered, ..
        }
        | BlockState::Observer { facing, powered } => {
            if powered && dir == facing {
                MAX_SIGNAL
            } else {
                0
            }
        }
        BlockState::Comparator {
            facing, powered, ..
        } => {
            if powered && dir == facing {
                grid.comparator_output(pos)
            } else {
                0
            }
        }
        // A torch strongly powers only the cell above it.
        BlockState::Torch { lit, .. } => {
            if lit && dir == Direction::Down {
                MAX_SIGNAL
            } else {
                0
            }
        }
        // Player-facing sources strongly power their support cell.
        BlockState::Button {
            facing, powered, ..
        }
        | BlockState::Lever {
            facing, powered, ..
        } => {
            if powered && dir == facing {
                MAX_SIGNAL
            } else {
                0
            }
        }
    }
}

/// The strongest direct signal the cell at `pos` receives from its six
/// neighbors.
pub fn direct_signal_into(grid: &Grid, pos: BlockPos) -> u8 {
    let mut strongest = 0u8;
    for dir in Direction::ALL {
        strongest = strongest.max(direct_signal(grid, pos.relative(dir), dir));
        if strongest >= MAX_SIGNAL {
            break;
        }
    }
    strongest
}

/// Whether any of the six neighbors of `pos` (including above) carries a
/// nonzero weak signal.
pub fn has_neighbor_signal(grid: &Grid, pos: BlockPos) -> bool {
    Direction::ALL
        .into_iter()
        .any(|dir| signal(grid, pos.relative(dir), dir) > 0)
}

/// Side-channel strength at `pos` for a block with the given input
/// `facing`: the max of the two lateral neighbor inputs, restricted to
/// the kinds `inputs` accepts.
pub fn alternate_signal(
    grid: &Grid,
    pos: BlockPos,
    facing: Direction,
    inputs: SideInputs,
) -> u8 {
    let mut strongest = 0u8;
    for dir in facing.sides() {
        let side_pos = pos.relative(dir);
        let side_state = grid.state(side_pos);
        let accepted = match inputs {
            SideInputs::DiodesOnly => side_state.is_diode(),
            SideInputs::Any => {
                side_state.is_diode()
                    || matches!(side_state, BlockState::PowerSource { .. })
            }
        };
        if accepted {
            strongest = strongest.max(signal(grid, side_pos, dir));
        }
    }
    strongest
}

/// Main-input strength for a diode-like block at `pos` whose input face
/// points toward `facing`.
pub fn diode_input_signal(grid: &Grid, pos: BlockPos, facing: Direction) -> u8 {
    signal(grid, pos.relative(facing), facing)
}

/// Main-input strength for a comparator, including the analog probe.
///
/// The input cell is read normally; if it (or, through one
/// signal-transparent cell, the cell beyond it) exposes an external
/// analog value, the strongest candidate wins.
pub fn comparator_input_signal(grid: &Grid, pos: BlockPos, facing: Direction) -> u8 {
    let front = pos.relative(facing);
    let relayed = signal(grid, front, facing);
    if let Some(analog) = grid.analog_source(front) {
        return relayed.max(analog);
    }
    if relayed < MAX_SIGNAL
        && matches!(grid.state(front), BlockState::Conductor)
        && let Some(analog) = grid.analog_source(front.relative(facing))
    {
        return relayed.max(analog);
    }
    relayed
}

#[cfg(test)]
mod tests {
    use pulse_types::ComparatorMode;

    use super::*;

    fn powered_lever(facing: Direction) -> BlockState {
        BlockState::lever(facing).with_powered(true)
    }

    #[test]
    fn air_is_silent() {
        let grid = Grid::new();
        for dir in Direction::ALL {
            assert_eq!(signal(&grid, BlockPos::ORIGIN, dir), 0);
            assert_eq!(direct_signal(&grid, BlockPos::ORIGIN, dir), 0);
        }
        assert!(!has_neighbor_signal(&grid, BlockPos::ORIGIN));
    }

    #[test]
    fn repeater_emits_only_toward_its_front() {
        let mut grid = Grid::new();
        let pos = BlockPos::ORIGIN;
        // Input faces west, so the output face is east and a consumer
        // east of the repeater queries with dir = West.
        let state = BlockState::repeater(Direction::West, 1).with_powered(true);
        let _ = grid.set(pos, state);

        assert_eq!(signal(&grid, pos, Direction::West), MAX_SIGNAL);
        for dir in Direction::ALL {
            if dir != Direction::West {
                assert_eq!(signal(&grid, pos, dir), 0, "leak toward {dir}");
            }
        }
        assert_eq!(direct_signal(&grid, pos, Direction::West), MAX_SIGNAL);
    }

    #[test]
    fn unpowered_repeater_is_silent() {
        let mut grid = Grid::new();
        let _ = grid.set(BlockPos::ORIGIN, BlockState::repeater(Direction::West, 1));
        assert_eq!(signal(&grid, BlockPos::ORIGIN, Direction::West), 0);
    }

    #[test]
    fn torch_emits_everywhere_except_its_support_face() {
        let mut grid = Grid::new();
        let pos = BlockPos::ORIGIN;
        // Attached to the cell below; facing points up, away from it.
        let _ = grid.set(pos, BlockState::torch(Direction::Up));

        for dir in Direction::ALL {
            let expected = if dir == Direction::Up { 0 } else { MAX_SIGNAL };
            assert_eq!(signal(&grid, pos, dir), expected, "toward {dir}");
        }
        // Strongly powers only the cell above (query travelling down).
        assert_eq!(direct_signal(&grid, pos, Direction::Down), MAX_SIGNAL);
        assert_eq!(direct_signal(&grid, pos, Direction::East), 0);
    }

    #[test]
    fn conductor_relays_direct_signal_as_weak() {
        let mut grid = Grid::new();
        let conductor = BlockPos::ORIGIN;
        let _ = grid.set(conductor, BlockState::Conductor);
        // Lever attached to the conductor's west face drives it strongly
        // (facing points away from the support cell).
        let _ = grid.set(conductor.relative(Direction::West), powered_lever(Direction::West));

        for dir in Direction::ALL {
            assert_eq!(signal(&grid, conductor, dir), MAX_SIGNAL);
        }
        // Conductors never emit strong signal themselves.
        assert_eq!(direct_signal(&grid, conductor, Direction::East), 0);
    }

    #[test]
    fn power_source_does_not_feed_a_conductor() {
        let mut grid = Grid::new();
        let conductor = BlockPos::ORIGIN;
        let _ = grid.set(conductor, BlockState::Conductor);
        let _ = grid.set(
            conductor.relative(Direction::West),
            BlockState::power_source(15),
        );
        assert_eq!(signal(&grid, conductor, Direction::East), 0);
    }

    #[test]
    fn has_neighbor_signal_sees_any_face() {
        let mut grid = Grid::new();
        let pos = BlockPos::ORIGIN;
        let _ = grid.set(pos.above(), BlockState::power_source(3));
        assert!(has_neighbor_signal(&grid, pos));
    }

    #[test]
    fn alternate_signal_reads_lateral_diodes_only() {
        let mut grid = Grid::new();
        let pos = BlockPos::ORIGIN;
        let facing = Direction::West;
        // A powered repeater pointing into our north side.
        let north = pos.relative(Direction::North);
        let _ = grid.set(
            north,
            BlockState::repeater(Direction::North, 1).with_powered(true),
        );

        assert_eq!(
            alternate_signal(&grid, pos, facing, SideInputs::DiodesOnly),
            MAX_SIGNAL
        );
    }

    #[test]
    fn alternate_signal_ignores_non_qualifying_neighbors() {
        let mut grid = Grid::new();
        let pos = BlockPos::ORIGIN;
        let facing = Direction::West;
        // A lever on the side is not a diode and not a constant emitter.
        let _ = grid.set(pos.relative(Direction::South), powered_lever(Direction::North));
        assert_eq!(
            alternate_signal(&grid, pos, facing, SideInputs::DiodesOnly),
            0
        );
        assert_eq!(alternate_signal(&grid, pos, facing, SideInputs::Any), 0);

        // A constant emitter qualifies for the comparator side channel.
        let _ = grid.set(pos.relative(Direction::South), BlockState::power_source(7));
        assert_eq!(alternate_signal(&grid, pos, facing, SideInputs::Any), 7);
        assert_eq!(
            alternate_signal(&grid, pos, facing, SideInputs::DiodesOnly),
            0
        );
    }

    #[test]
    fn sideways_repeater_does_not_count_toward_alternate() {
        let mut grid = Grid::new();
        let pos = BlockPos::ORIGIN;
        // Repeater on the north side facing east: its output points west,
        // not into our side face, so it contributes nothing.
        let _ = grid.set(
            pos.relative(Direction::North),
            BlockState::repeater(Direction::East, 1).with_powered(true),
        );
        assert_eq!(
            alternate_signal(&grid, pos, Direction::West, SideInputs::DiodesOnly),
            0
        );
    }

    #[test]
    fn comparator_input_prefers_strongest_candidate() {
        let mut grid = Grid::new();
        let pos = BlockPos::ORIGIN;
        let facing = Direction::West;
        let front = pos.relative(facing);

        // Weak conductor relay vs. a stronger analog source on the same cell.
        let _ = grid.set(front, BlockState::Conductor);
        let _ = grid.set(front.relative(Direction::North), powered_lever(Direction::North));
        assert_eq!(comparator_input_signal(&grid, pos, facing), MAX_SIGNAL);

        let _ = grid.set(front.relative(Direction::North), BlockState::lever(Direction::North));
        let _ = grid.set_analog_source(front, Some(9));
        assert_eq!(comparator_input_signal(&grid, pos, facing), 9);
    }

    #[test]
    fn comparator_probes_two_cells_through_a_conductor() {
        let mut grid = Grid::new();
        let pos = BlockPos::ORIGIN;
        let facing = Direction::West;
        let front = pos.relative(facing);
        let far = front.relative(facing);

        let _ = grid.set(front, BlockState::Conductor);
        let _ = grid.set_analog_source(far, Some(11));
        assert_eq!(comparator_input_signal(&grid, pos, facing), 11);

        // Without the conductor in between, the far source is invisible.
        let _ = grid.remove(front);
        assert_eq!(comparator_input_signal(&grid, pos, facing), 0);
    }

    #[test]
    fn comparator_emits_its_cached_value() {
        let mut grid = Grid::new();
        let pos = BlockPos::ORIGIN;
        let state = BlockState::comparator(Direction::West, ComparatorMode::Compare)
            .with_powered(true);
        let _ = grid.set(pos, state);
        grid.set_comparator_output(pos, 6);

        assert_eq!(signal(&grid, pos, Direction::West), 6);
        assert_eq!(signal(&grid, pos, Direction::East), 0);
    }
}
