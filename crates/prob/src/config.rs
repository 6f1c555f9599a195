//! Simulation configuration.
//!
//! The seed is configuration, not ambient state: it is read here and handed
//! to [`SampleContext::new`](crate::SampleContext::new).

use crate::context::DEFAULT_SEED;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Settings for a simulation run.
///
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Seed for the random generator
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Number of independent weather runs
    #[serde(default = "default_runs")]
    pub runs: usize,

    /// Success probability for the geometric recursion
    #[serde(default = "default_geometric_p")]
    pub geometric_p: f64,

    /// Most flips the geometric recursion may take before giving up
    #[serde(default = "default_max_flips")]
    pub max_flips: usize,
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_runs() -> usize {
    3
}

fn default_geometric_p() -> f64 {
    0.5
}

fn default_max_flips() -> usize {
    10_000
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            runs: default_runs(),
            geometric_p: default_geometric_p(),
            max_flips: default_max_flips(),
        }
    }
}

impl SimulationConfig {
    /// Load and validate a TOML configuration file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_owned(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_owned(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.runs == 0 {
            return Err(ConfigError::Invalid {
                field: "runs",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(self.geometric_p > 0.0 && self.geometric_p <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "geometric_p",
                reason: format!("must lie in (0, 1], got {}", self.geometric_p),
            });
        }
        if self.max_flips == 0 {
            return Err(ConfigError::Invalid {
                field: "max_flips",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// An annotated example file.
    pub fn example_toml() -> &'static str {
        r#"# stochastic configuration file

# Seed for the random generator (reproducible runs)
seed = 101

# Number of independent weather runs
runs = 3

# Success probability for the geometric recursion, in (0, 1]
geometric_p = 0.5

# Most flips the geometric recursion may take
max_flips = 10000
"#
    }
}

/// Errors from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}
