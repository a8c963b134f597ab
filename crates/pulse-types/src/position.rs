//! Grid coordinates, directions, and notification orientation.
//!
//! A [`BlockPos`] is an integer 3-tuple referencing a cell in the host's
//! grid. The engine never owns positions -- it only reads and writes the
//! cells they name. All coordinate types implement [`Ord`] so that
//! `BTreeMap`/`BTreeSet` collections keyed on them iterate in a stable,
//! reproducible order.

use serde::{Deserialize, Serialize};

/// An integer coordinate in the 3D grid.
///
/// Offsets use saturating arithmetic: a position at the numeric edge of
/// the coordinate space clamps rather than wrapping.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct BlockPos {
    /// West-east coordinate (east is positive).
    pub x: i32,
    /// Down-up coordinate (up is positive).
    pub y: i32,
    /// North-south coordinate (south is positive).
    pub z: i32,
}

impl BlockPos {
    /// The origin cell `(0, 0, 0)`.
    pub const ORIGIN: Self = Self::new(0, 0, 0);

    /// Create a position from its coordinates.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Return the adjacent position one step in the given direction.
    pub const fn relative(self, direction: Direction) -> Self {
        let (dx, dy, dz) = direction.offset();
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            z: self.z.saturating_add(dz),
        }
    }

    /// Return the position directly above this one.
    pub const fn above(self) -> Self {
        self.relative(Direction::Up)
    }

    /// Return the position directly below this one.
    pub const fn below(self) -> Self {
        self.relative(Direction::Down)
    }

    /// Return all six adjacent positions, in [`Direction::ALL`] order.
    pub const fn neighbors(self) -> [Self; 6] {
        [
            self.relative(Direction::Down),
            self.relative(Direction::Up),
            self.relative(Direction::North),
            self.relative(Direction::South),
            self.relative(Direction::West),
            self.relative(Direction::East),
        ]
    }
}

impl core::fmt::Display for BlockPos {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// One of the three coordinate axes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Axis {
    /// West-east.
    X,
    /// Down-up.
    Y,
    /// North-south.
    Z,
}

impl Axis {
    /// Whether this axis lies in the horizontal plane.
    pub const fn is_horizontal(self) -> bool {
        !matches!(self, Self::Y)
    }
}

/// One of the six face directions of a grid cell.
///
/// The declaration order is the canonical iteration order used by every
/// neighbor fan-out in the engine; keeping it fixed is part of the
/// determinism contract.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Direction {
    /// Negative Y.
    Down,
    /// Positive Y.
    Up,
    /// Negative Z.
    North,
    /// Positive Z.
    South,
    /// Negative X.
    West,
    /// Positive X.
    East,
}

impl Direction {
    /// All six directions in canonical order.
    pub const ALL: [Self; 6] = [
        Self::Down,
        Self::Up,
        Self::North,
        Self::South,
        Self::West,
        Self::East,
    ];

    /// The direction pointing the opposite way.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Down => Self::Up,
            Self::Up => Self::Down,
            Self::North => Self::South,
            Self::South => Self::North,
            Self::West => Self::East,
            Self::East => Self::West,
        }
    }

    /// The axis this direction lies on.
    pub const fn axis(self) -> Axis {
        match self {
            Self::Down | Self::Up => Axis::Y,
            Self::North | Self::South => Axis::Z,
            Self::West | Self::East => Axis::X,
        }
    }

    /// Whether this direction lies in the horizontal plane.
    pub const fn is_horizontal(self) -> bool {
        self.axis().is_horizontal()
    }

    /// The unit offset `(dx, dy, dz)` of one step in this direction.
    pub const fn offset(self) -> (i32, i32, i32) {
        match self {
            Self::Down => (0, -1, 0),
            Self::Up => (0, 1, 0),
            Self::North => (0, 0, -1),
            Self::South => (0, 0, 1),
            Self::West => (-1, 0, 0),
            Self::East => (1, 0, 0),
        }
    }

    /// Rotate a quarter turn clockwise about the vertical axis (viewed
    /// from above). Vertical directions are unchanged.
    pub const fn clockwise(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
            Self::Down | Self::Up => self,
        }
    }

    /// Rotate a quarter turn counterclockwise about the vertical axis
    /// (viewed from above). Vertical directions are unchanged.
    pub const fn counterclockwise(self) -> Self {
        match self {
            Self::North => Self::West,
            Self::West => Self::South,
            Self::South => Self::East,
            Self::East => Self::North,
            Self::Down | Self::Up => self,
        }
    }

    /// The two directions perpendicular to `self` in the horizontal
    /// plane: `[clockwise, counterclockwise]`.
    pub const fn sides(self) -> [Self; 2] {
        [self.clockwise(), self.counterclockwise()]
    }
}

impl core::fmt::Display for Direction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Down => "down",
            Self::Up => "up",
            Self::North => "north",
            Self::South => "south",
            Self::West => "west",
            Self::East => "east",
        };
        write!(f, "{name}")
    }
}

/// Directional metadata attached to a neighbor-change notification.
///
/// The receiving block uses the orientation to disambiguate which of its
/// faces the update came through -- comparator-style blocks have a main
/// input face and two independent side-input faces with different
/// semantics.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Orientation {
    /// The direction the notification travels in.
    pub front: Direction,
    /// The up-reference used to resolve lateral faces.
    pub up: Direction,
}

impl core::fmt::Display for Orientation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "front={} up={}", self.front, self.up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_moves_one_step() {
        let pos = BlockPos::new(1, 2, 3);
        assert_eq!(pos.relative(Direction::East), BlockPos::new(2, 2, 3));
        assert_eq!(pos.relative(Direction::Down), BlockPos::new(1, 1, 3));
        assert_eq!(pos.above(), BlockPos::new(1, 3, 3));
        assert_eq!(pos.below(), BlockPos::new(1, 1, 3));
    }

    #[test]
    fn relative_saturates_at_coordinate_edge() {
        let pos = BlockPos::new(i32::MAX, 0, i32::MIN);
        assert_eq!(pos.relative(Direction::East).x, i32::MAX);
        assert_eq!(pos.relative(Direction::North).z, i32::MIN);
    }

    #[test]
    fn opposite_is_an_involution() {
        for direction in Direction::ALL {
            assert_eq!(direction.opposite().opposite(), direction);
            assert_ne!(direction.opposite(), direction);
        }
    }

    #[test]
    fn offsets_are_unit_steps() {
        for direction in Direction::ALL {
            let (dx, dy, dz) = direction.offset();
            assert_eq!(dx.abs().saturating_add(dy.abs()).saturating_add(dz.abs()), 1);
        }
    }

    #[test]
    fn rotation_cycles_through_horizontals() {
        let mut direction = Direction::North;
        for _ in 0..4 {
            direction = direction.clockwise();
            assert!(direction.is_horizontal());
        }
        assert_eq!(direction, Direction::North);
        assert_eq!(Direction::East.counterclockwise(), Direction::North);
    }

    #[test]
    fn vertical_rotation_is_identity() {
        assert_eq!(Direction::Up.clockwise(), Direction::Up);
        assert_eq!(Direction::Down.counterclockwise(), Direction::Down);
    }

    #[test]
    fn sides_are_perpendicular() {
        let [cw, ccw] = Direction::West.sides();
        assert_eq!(cw, Direction::North);
        assert_eq!(ccw, Direction::South);
        assert_eq!(cw.opposite(), ccw);
    }

    #[test]
    fn neighbors_follow_canonical_order() {
        let all = BlockPos::ORIGIN.neighbors();
        for (neighbor, direction) in all.iter().zip(Direction::ALL) {
            assert_eq!(*neighbor, BlockPos::ORIGIN.relative(direction));
        }
    }

    #[test]
    fn position_roundtrip_serde() {
        let original = BlockPos::new(-4, 7, 12);
        let json = serde_json::to_string(&original).ok();
        assert!(json.is_some());
        let restored: Result<BlockPos, _> =
            serde_json::from_str(json.as_deref().unwrap_or(""));
        assert_eq!(restored.ok(), Some(original));
    }
}
