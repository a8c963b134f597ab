//! Orientation-aware neighbor notification fan-out.
//!
//! Directed blocks do not blast updates at all six neighbors: a diode's
//! change matters to the cell in front of it and to that cell's
//! surroundings. The fan-out here notifies the front cell, then the
//! front cell's remaining neighbors -- excluding the direction pointing
//! back at the originator. The exclusion is mandatory: without it, two
//! adjacent logic blocks notify each other forever.

use pulse_types::{BlockPos, BlockState, Direction, Orientation};

use crate::engine::Simulation;

/// Build the orientation a directed block attaches to its front
/// fan-out: the notification travels out of the output face, with up
/// resolved to the vertical for horizontal blocks and to the block's own
/// facing otherwise.
pub fn front_orientation(state: BlockState) -> Option<Orientation> {
    let facing = state.facing()?;
    let up = if facing.is_horizontal() {
        Direction::Up
    } else {
        facing
    };
    Some(Orientation {
        front: facing.opposite(),
        up,
    })
}

/// Notify the cell in front of a directed block, then that cell's other
/// neighbors.
///
/// `state` is the block's state at `pos` (the caller has usually just
/// written it). Blocks without a facing fan out nothing here.
pub(crate) fn update_neighbors_in_front(
    sim: &mut Simulation,
    pos: BlockPos,
    state: BlockState,
) {
    let Some(facing) = state.facing() else {
        return;
    };
    let orientation = front_orientation(state);
    let front = pos.relative(facing.opposite());
    sim.enqueue_neighbor_changed(front, pos, orientation);
    for dir in Direction::ALL {
        // The neighbor in `facing` direction is the originator itself;
        // notifying it would ping-pong between the two blocks.
        if dir == facing {
            continue;
        }
        sim.enqueue_neighbor_changed(front.relative(dir), front, orientation);
    }
}

/// Ring the six neighbors of `pos` with undirected change notifications.
///
/// Used for second-hop fan-out when a strong signal travels through a
/// relaying cell whose own stored state never changes.
pub(crate) fn update_neighbors_of(sim: &mut Simulation, pos: BlockPos) {
    for dir in Direction::ALL {
        sim.enqueue_neighbor_changed(pos.relative(dir), pos, None);
    }
}

/// Notify the neighbors of an attached block and of its support cell.
///
/// Used by buttons and levers, whose strong signal travels through the
/// cell they are mounted on.
pub(crate) fn update_attached_neighbors(
    sim: &mut Simulation,
    pos: BlockPos,
    facing: Direction,
) {
    let into_support = facing.opposite();
    let up = if into_support.is_horizontal() {
        Direction::Up
    } else {
        facing
    };
    let orientation = Some(Orientation {
        front: into_support,
        up,
    });
    for dir in Direction::ALL {
        sim.enqueue_neighbor_changed(pos.relative(dir), pos, orientation);
    }
    let support = pos.relative(into_support);
    for dir in Direction::ALL {
        sim.enqueue_neighbor_changed(support.relative(dir), support, orientation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_blocks_use_vertical_up_reference() {
        let state = BlockState::repeater(Direction::West, 1);
        let orientation = front_orientation(state);
        assert_eq!(
            orientation,
            Some(Orientation {
                front: Direction::East,
                up: Direction::Up,
            })
        );
    }

    #[test]
    fn vertical_blocks_use_their_facing_as_up_reference() {
        let state = BlockState::observer(Direction::Down);
        let orientation = front_orientation(state);
        assert_eq!(
            orientation,
            Some(Orientation {
                front: Direction::Up,
                up: Direction::Down,
            })
        );
    }

    #[test]
    fn undirected_blocks_have_no_front() {
        assert_eq!(front_orientation(BlockState::Conductor), None);
        assert_eq!(front_orientation(BlockState::lamp()), None);
    }
}
