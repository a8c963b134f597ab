//! Block states: the immutable per-cell values the engine reads and
//! replaces.
//!
//! A [`BlockState`] is a closed tagged union over the finite set of block
//! kinds this engine understands. Every dispatch site matches it
//! exhaustively, so adding a kind forces a compile-time review of every
//! piece of logic that touches cells. Replacing a cell's state is the only
//! way the grid changes; states are never mutated in place.

use serde::{Deserialize, Serialize};

use crate::enums::ComparatorMode;
use crate::position::Direction;

/// Maximum signal strength a cell can carry or emit.
pub const MAX_SIGNAL: u8 = 15;

/// Smallest configurable repeater delay, in ticks.
pub const MIN_REPEATER_DELAY: u8 = 1;

/// Largest configurable repeater delay, in ticks.
pub const MAX_REPEATER_DELAY: u8 = 4;

/// The contents of one grid cell.
///
/// Constructors clamp numeric properties into their valid ranges, so a
/// state built through them is always well-formed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum BlockState {
    /// Empty cell.
    Air,
    /// Signal-transparent solid. Relays the strongest direct signal fed
    /// into it as weak signal on every face, and passes the comparator's
    /// far-analog probe through.
    Conductor,
    /// Fixed-strength emitter, weak on every face. Used by hosts and
    /// scenarios as a constant input.
    PowerSource {
        /// Emitted strength, `0..=15`.
        strength: u8,
    },
    /// Delayed one-directional latch.
    Repeater {
        /// Direction of the input face.
        facing: Direction,
        /// Transition delay in ticks, `1..=4`.
        delay: u8,
        /// Whether the output is currently driven.
        powered: bool,
        /// Whether a side input is holding the output frozen.
        locked: bool,
    },
    /// Arithmetic diode: compares or subtracts its side input.
    Comparator {
        /// Direction of the main input face.
        facing: Direction,
        /// Compare or subtract.
        mode: ComparatorMode,
        /// Whether the output is currently driven.
        powered: bool,
    },
    /// Inverting emitter attached to a support cell.
    Torch {
        /// Direction pointing away from the support cell.
        facing: Direction,
        /// Whether the torch is emitting.
        lit: bool,
    },
    /// Edge detector: pulses when the cell it faces changes.
    Observer {
        /// Direction of the observed cell.
        facing: Direction,
        /// Whether the pulse output is currently driven.
        powered: bool,
    },
    /// Momentary player-facing source; releases itself after a fixed
    /// number of ticks.
    Button {
        /// Direction pointing away from the support cell.
        facing: Direction,
        /// Whether the button is currently pressed.
        powered: bool,
    },
    /// Latching player-facing source.
    Lever {
        /// Direction pointing away from the support cell.
        facing: Direction,
        /// Whether the lever is currently on.
        powered: bool,
    },
    /// Weak-signal consumer; lights when any neighbor carries signal.
    Lamp {
        /// Whether the lamp is currently lit.
        lit: bool,
    },
}

impl BlockState {
    /// A new unpowered, unlocked repeater with the given delay (clamped
    /// to `1..=4`).
    pub const fn repeater(facing: Direction, delay: u8) -> Self {
        let delay = clamp_delay(delay);
        Self::Repeater {
            facing,
            delay,
            powered: false,
            locked: false,
        }
    }

    /// A new unpowered comparator.
    pub const fn comparator(facing: Direction, mode: ComparatorMode) -> Self {
        Self::Comparator {
            facing,
            mode,
            powered: false,
        }
    }

    /// A new lit torch (a torch with no input burns by default).
    pub const fn torch(facing: Direction) -> Self {
        Self::Torch { facing, lit: true }
    }

    /// A new idle observer.
    pub const fn observer(facing: Direction) -> Self {
        Self::Observer {
            facing,
            powered: false,
        }
    }

    /// A new unpressed button.
    pub const fn button(facing: Direction) -> Self {
        Self::Button {
            facing,
            powered: false,
        }
    }

    /// A new lever in the off position.
    pub const fn lever(facing: Direction) -> Self {
        Self::Lever {
            facing,
            powered: false,
        }
    }

    /// A new constant emitter with the given strength (clamped to 15).
    pub const fn power_source(strength: u8) -> Self {
        let strength = if strength > MAX_SIGNAL {
            MAX_SIGNAL
        } else {
            strength
        };
        Self::PowerSource { strength }
    }

    /// A new unlit lamp.
    pub const fn lamp() -> Self {
        Self::Lamp { lit: false }
    }

    /// The kind tag of this state.
    pub const fn kind(&self) -> BlockKind {
        match self {
            Self::Air => BlockKind::Air,
            Self::Conductor => BlockKind::Conductor,
            Self::PowerSource { .. } => BlockKind::PowerSource,
            Self::Repeater { .. } => BlockKind::Repeater,
            Self::Comparator { .. } => BlockKind::Comparator,
            Self::Torch { .. } => BlockKind::Torch,
            Self::Observer { .. } => BlockKind::Observer,
            Self::Button { .. } => BlockKind::Button,
            Self::Lever { .. } => BlockKind::Lever,
            Self::Lamp { .. } => BlockKind::Lamp,
        }
    }

    /// The facing property, for kinds that have one.
    pub const fn facing(&self) -> Option<Direction> {
        match self {
            Self::Repeater { facing, .. }
            | Self::Comparator { facing, .. }
            | Self::Torch { facing, .. }
            | Self::Observer { facing, .. }
            | Self::Button { facing, .. }
            | Self::Lever { facing, .. } => Some(*facing),
            Self::Air | Self::Conductor | Self::PowerSource { .. } | Self::Lamp { .. } => {
                None
            }
        }
    }

    /// Whether this state is currently driving an output.
    pub const fn is_powered(&self) -> bool {
        match self {
            Self::Repeater { powered, .. }
            | Self::Comparator { powered, .. }
            | Self::Observer { powered, .. }
            | Self::Button { powered, .. }
            | Self::Lever { powered, .. } => *powered,
            Self::Torch { lit, .. } | Self::Lamp { lit } => *lit,
            Self::PowerSource { strength } => *strength > 0,
            Self::Air | Self::Conductor => false,
        }
    }

    /// Whether this is a diode-like block (one-directional delayed latch).
    pub const fn is_diode(&self) -> bool {
        matches!(self, Self::Repeater { .. } | Self::Comparator { .. })
    }

    /// Whether this cell is empty.
    pub const fn is_air(&self) -> bool {
        matches!(self, Self::Air)
    }

    /// Copy of this state with the powered flag replaced. States without
    /// a powered flag are returned unchanged.
    pub const fn with_powered(self, powered: bool) -> Self {
        match self {
            Self::Repeater {
                facing,
                delay,
                locked,
                ..
            } => Self::Repeater {
                facing,
                delay,
                powered,
                locked,
            },
            Self::Comparator { facing, mode, .. } => Self::Comparator {
                facing,
                mode,
                powered,
            },
            Self::Observer { facing, .. } => Self::Observer { facing, powered },
            Self::Button { facing, .. } => Self::Button { facing, powered },
            Self::Lever { facing, .. } => Self::Lever { facing, powered },
            Self::Torch { facing, .. } => Self::Torch {
                facing,
                lit: powered,
            },
            Self::Lamp { .. } => Self::Lamp { lit: powered },
            Self::Air | Self::Conductor | Self::PowerSource { .. } => self,
        }
    }

    /// Copy of this state with the lock flag replaced (repeaters only;
    /// other states are returned unchanged).
    pub const fn with_locked(self, locked: bool) -> Self {
        match self {
            Self::Repeater {
                facing,
                delay,
                powered,
                ..
            } => Self::Repeater {
                facing,
                delay,
                powered,
                locked,
            },
            other => other,
        }
    }

    /// Copy of this state with the comparator mode replaced (comparators
    /// only; other states are returned unchanged).
    pub const fn with_mode(self, mode: ComparatorMode) -> Self {
        match self {
            Self::Comparator {
                facing, powered, ..
            } => Self::Comparator {
                facing,
                mode,
                powered,
            },
            other => other,
        }
    }
}

const fn clamp_delay(delay: u8) -> u8 {
    if delay < MIN_REPEATER_DELAY {
        MIN_REPEATER_DELAY
    } else if delay > MAX_REPEATER_DELAY {
        MAX_REPEATER_DELAY
    } else {
        delay
    }
}

/// The kind tag of a [`BlockState`], without properties.
///
/// Scheduled events carry the kind they were created for; at fire time
/// the event is discarded if the cell's kind no longer matches.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum BlockKind {
    /// Empty cell.
    Air,
    /// Signal-transparent solid.
    Conductor,
    /// Fixed-strength emitter.
    PowerSource,
    /// Delayed one-directional latch.
    Repeater,
    /// Arithmetic diode.
    Comparator,
    /// Inverting emitter.
    Torch,
    /// Edge detector.
    Observer,
    /// Momentary source.
    Button,
    /// Latching source.
    Lever,
    /// Weak-signal consumer.
    Lamp,
}

impl core::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Air => "air",
            Self::Conductor => "conductor",
            Self::PowerSource => "power-source",
            Self::Repeater => "repeater",
            Self::Comparator => "comparator",
            Self::Torch => "torch",
            Self::Observer => "observer",
            Self::Button => "button",
            Self::Lever => "lever",
            Self::Lamp => "lamp",
        };
        write!(f, "{name}")
    }
}
