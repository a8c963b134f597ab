//! Error types for the `pulse-core` crate.
//!
//! There are no fatal conditions inside the engine itself: stale events
//! are discarded, contradictory neighbor inputs settle to a deterministic
//! state, and the toggle-storm guard degrades oscillating blocks instead
//! of failing. [`EngineError`] covers the boundary: invalid host requests
//! and counter exhaustion.

use pulse_types::{BlockKind, BlockPos};

/// Errors surfaced to the host at the engine API boundary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,

    /// A user operation targeted a cell of the wrong kind.
    #[error("expected {expected} at {pos}, found {found}")]
    WrongKind {
        /// The targeted cell.
        pos: BlockPos,
        /// The kind the operation requires.
        expected: BlockKind,
        /// The kind actually present.
        found: BlockKind,
    },
}
