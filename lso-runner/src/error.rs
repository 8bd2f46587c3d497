//! Error types for the process runner

use std::io;
use thiserror::Error;

/// Result type alias for runner operations
pub type Result<T> = std::result::Result<T, RunnerError>;

/// Errors that prevent a process from producing an exit status
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The program could not be started
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Extra variables or an inventory could not be encoded as JSON
    #[error("failed to encode JSON argument: {0}")]
    Encode(#[from] serde_json::Error),

    /// Reading output or waiting for exit failed
    #[error("I/O error while running process: {0}")]
    Io(#[from] io::Error),
}
