//! Tick scheduling, block state machines, and the simulation engine for
//! Pulse.
//!
//! This crate composes the pieces of the discrete-event signal engine:
//! the priority-ordered tick queue, the generic diode latch and its
//! per-kind behaviors, the toggle-storm guard, the orientation-aware
//! neighbor notifier, and the [`Simulation`] instance the host drives.
//!
//! # Modules
//!
//! - [`scheduler`] -- [`TickQueue`]: `(due, priority, sequence)`-ordered
//!   deferred firings with structural duplicate suppression.
//! - [`guard`] -- [`ToggleHistory`]: the toggle-storm rate limiter.
//! - [`diode`] -- the generic delayed latch and the [`DiodeBehavior`]
//!   capability interface.
//! - [`repeater`], [`comparator`] -- the two diode kinds.
//! - [`torch`], [`observer`] -- self-oscillation-prone blocks under the
//!   guard.
//! - [`button`], [`lever`], [`lamp`] -- player-facing sources and the
//!   weak-signal consumer.
//! - [`notify`] -- directed fan-out with back-notification exclusion.
//! - [`engine`] -- [`Simulation`], [`TickSummary`], and update dispatch.
//! - [`error`] -- [`EngineError`].
//!
//! [`DiodeBehavior`]: diode::DiodeBehavior

pub mod button;
pub mod comparator;
pub mod diode;
pub mod engine;
pub mod error;
pub mod guard;
pub mod lamp;
pub mod lever;
pub mod notify;
pub mod observer;
pub mod repeater;
pub mod scheduler;
pub mod torch;

// Re-export primary types at crate root.
pub use engine::{Simulation, TickSummary, UpdateFlags};
pub use error::EngineError;
pub use guard::{
    ToggleHistory, ToggleRecord, BURNOUT_RECOVERY_TICKS, TOGGLE_TRIP_COUNT,
    TOGGLE_WINDOW_TICKS,
};
pub use scheduler::{ScheduledTick, TickQueue};
