//! Shared type definitions for the Pulse signal engine.
//!
//! This crate is the single source of truth for the types used across the
//! Pulse workspace: grid coordinates, block states, scheduling priorities,
//! and the observable events the engine hands back to its host.
//!
//! # Modules
//!
//! - [`position`] -- Grid coordinates, face directions, and notification
//!   orientation
//! - [`enums`] -- Tick priorities and comparator modes
//! - [`state`] -- The closed [`BlockState`] union and its kind tags
//! - [`events`] -- Observable side effects emitted to the host

pub mod enums;
pub mod events;
pub mod position;
pub mod state;

// Re-export all public types at crate root for convenience.
pub use enums::{ComparatorMode, TickPriority};
pub use events::EngineEvent;
pub use position::{Axis, BlockPos, Direction, Orientation};
pub use state::{
    BlockKind, BlockState, MAX_REPEATER_DELAY, MAX_SIGNAL, MIN_REPEATER_DELAY,
};
