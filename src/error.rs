//! Error types for trueno-experiment
//!
//! Toyota Way: Clear error messages with actionable guidance (Respect for People)

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Experiment tracking error types
#[derive(Error, Debug)]
pub enum Error {
    /// Value cannot be represented in the target format (JSON or binary)
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Persisted file exists but is corrupt or incompatible
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// Requested file does not exist in the experiment directory
    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Experiment or file name cannot be used as a single path component
    #[error("Invalid name: {0}")]
    InvalidName(String),

    /// Configuration is not a JSON object or carries a malformed reserved key
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
