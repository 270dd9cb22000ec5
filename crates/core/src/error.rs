//! Error types for s3ctl-core
//!
//! Provides a unified error type whose variants the CLI maps to exit codes.

use thiserror::Error;

/// Result type alias for s3ctl-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for s3ctl-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication or permission failure
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict error
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// General error
    #[error("{0}")]
    General(String),
}
