//! Error handling module
//!
//! This module defines the error types and result type aliases used in the application.

use thiserror::Error;
use std::io;

use crate::algorithm::AlgorithmCategory;

/// SSH algorithm matrix error type
#[derive(Error, Debug)]
pub enum MatrixError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Testbed lookup error
    #[error("Testbed error: {0}")]
    Testbed(String),

    /// The DUT query for a category failed or returned unparsable output
    #[error("Failed to query DUT's {category} list: {output}")]
    RemoteQuery {
        /// Category being queried
        category: AlgorithmCategory,
        /// Raw command output (stdout followed by stderr)
        output: String,
    },

    /// Device command error (decap setup and teardown)
    #[error("Device error on {host}: {message}")]
    Device {
        /// Device hostname
        host: String,
        /// What went wrong
        message: String,
    },

    /// Other error
    #[error("Other error: {0}")]
    Other(String),
}

/// Result type alias
///
/// This is a `Result` type alias that uses our custom `MatrixError`.
pub type Result<T> = std::result::Result<T, MatrixError>;
