//! Error types for the simulation harness.

use skyscout_core::ScoutError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A required key was not present
    #[error("missing required key `{0}`")]
    MissingKey(&'static str),

    /// A value could not be parsed for its key
    #[error("invalid value {value:?} for `{key}` on line {line}")]
    InvalidValue {
        key: String,
        value: String,
        line: usize,
    },

    /// Values parsed but do not describe a runnable simulation
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Creates a validation error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}

/// Errors that stop a simulation run.
#[derive(Debug, Error)]
pub enum SimError {
    /// Bad configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Terrain or drone setup failed
    #[error("setup failed: {0}")]
    Setup(#[from] ScoutError),

    /// Ran out of free cells while placing drones
    #[error("no free cell left to place drone {drone_id}")]
    Placement { drone_id: usize },

    /// Frame output directory could not be created
    #[error("failed to prepare frame directory {}: {source}", .path.display())]
    FrameDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A frame could not be written
    #[error("failed to write frame {frame}: {source}")]
    Frame {
        frame: u64,
        #[source]
        source: io::Error,
    },
}
