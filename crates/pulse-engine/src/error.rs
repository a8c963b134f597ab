//! Error types for the scenario runner binary.

use crate::config::ConfigError;

/// Errors that can abort a runner invocation.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Configuration could not be loaded or parsed.
    #[error("config error: {source}")]
    Config {
        /// The underlying configuration error.
        #[from]
        source: ConfigError,
    },

    /// The configured scenario cannot be built.
    #[error("invalid scenario: {reason}")]
    InvalidScenario {
        /// Explanation of what is wrong with the scenario parameters.
        reason: String,
    },

    /// The engine rejected an operation.
    #[error("engine error: {source}")]
    Engine {
        /// The underlying engine error.
        #[from]
        source: pulse_core::EngineError,
    },
}
