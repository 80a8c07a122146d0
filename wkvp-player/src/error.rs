//! Error types for wkvp-player
//!
//! Defines engine-specific error types using thiserror for clear error
//! propagation. Persistence failures are logged and swallowed inside the
//! engine; only validation and submission failures reach callers.

use thiserror::Error;

/// Main error type for the wkvp-player engine
#[derive(Error, Debug)]
pub enum Error {
    /// Overlay text rejected before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Transport-level failure talking to the external store
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The external store rejected a request
    #[error("Store error {status}: {message}")]
    Store { status: u16, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid state for operation
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Convenience Result type using the wkvp-player Error
pub type Result<T> = std::result::Result<T, Error>;

impl From<wkvp_common::Error> for Error {
    fn from(err: wkvp_common::Error) -> Self {
        Error::Config(err.to_string())
    }
}
