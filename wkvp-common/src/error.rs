//! Common error types for WKVP
//!
//! Defines shared error types using thiserror for clear error propagation.

use thiserror::Error;

/// Common result type for WKVP operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared across WKVP crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
