//! Grid storage and signal queries for the Pulse signal engine.
//!
//! This crate models the physical side of the simulation: a sparse 3D
//! cell store with deterministic iteration, and the read-only signal
//! query interface the logic layer evaluates block transitions against.
//!
//! # Modules
//!
//! - [`grid`] -- [`Grid`]: sparse block storage plus the analog-source
//!   and comparator-output side tables.
//! - [`signal`] -- weak/strong/side-channel strength queries with the
//!   one-directional diode contract.
//!
//! [`Grid`]: grid::Grid

pub mod grid;
pub mod signal;

// Re-export primary types at crate root.
pub use grid::Grid;
pub use signal::SideInputs;
