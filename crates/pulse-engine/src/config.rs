//! Configuration loading and typed config structures for the scenario
//! runner.
//!
//! The canonical configuration lives in `pulse-config.yaml` next to the
//! binary's working directory. This module defines strongly-typed
//! structs mirroring the YAML structure and a loader that reads and
//! validates the file. All fields default sensibly, so a missing file
//! runs the default scenario.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level runner configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Number of simulation steps to run.
    pub ticks: u64,
    /// The circuit to build and drive.
    pub scenario: ScenarioConfig,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            ticks: 24,
            scenario: ScenarioConfig::default(),
        }
    }
}

impl RunnerConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(Self::parse(&contents)?)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, serde_yml::Error> {
        serde_yml::from_str(yaml)
    }
}

/// The demo circuit to build.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScenarioConfig {
    /// A straight chain of repeaters driven by a lever, ending in a lamp.
    RepeaterChain {
        /// Number of repeaters in the chain.
        length: u32,
        /// Per-repeater delay in ticks (`1..=4`).
        delay: u8,
    },
    /// A torch fed back onto its own support: oscillates until the
    /// toggle-storm guard freezes it.
    TorchClock,
    /// A comparator in subtract mode with constant main and side inputs.
    ComparatorSubtract {
        /// Main input strength.
        input: u8,
        /// Side input strength.
        side: u8,
    },
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self::RepeaterChain {
            length: 8,
            delay: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_fields_are_missing() {
        let config = RunnerConfig::parse("{}").ok();
        assert_eq!(config, Some(RunnerConfig::default()));
    }

    #[test]
    fn full_config_parses() {
        let yaml = "\
ticks: 40
scenario:
  kind: comparator_subtract
  input: 12
  side: 3
";
        let config = RunnerConfig::parse(yaml).ok();
        assert_eq!(
            config,
            Some(RunnerConfig {
                ticks: 40,
                scenario: ScenarioConfig::ComparatorSubtract { input: 12, side: 3 },
            })
        );
    }

    #[test]
    fn unknown_scenario_kind_is_rejected() {
        let yaml = "scenario:\n  kind: perpetual_motion\n";
        assert!(RunnerConfig::parse(yaml).is_err());
    }

    #[test]
    fn torch_clock_parses_without_parameters() {
        let yaml = "scenario:\n  kind: torch_clock\n";
        let config = RunnerConfig::parse(yaml).ok();
        assert_eq!(
            config.map(|c| c.scenario),
            Some(ScenarioConfig::TorchClock)
        );
    }
}
