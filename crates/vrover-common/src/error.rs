//! Common error types for Vrover.

use thiserror::Error;

/// Result type alias using Vrover's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for Vrover operations.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (socket, file)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Tracking runtime failure
    #[error("tracking error: {0}")]
    Tracking(String),

    /// Control-link transport failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a config error from any displayable type.
    pub fn config(msg: impl std::fmt::Display) -> Self {
        Self::Config(msg.to_string())
    }

    /// Create a tracking error from any displayable type.
    pub fn tracking(msg: impl std::fmt::Display) -> Self {
        Self::Tracking(msg.to_string())
    }

    /// Create a transport error from any displayable type.
    pub fn transport(msg: impl std::fmt::Display) -> Self {
        Self::Transport(msg.to_string())
    }

    /// Create an internal error from any displayable type.
    pub fn internal(msg: impl std::fmt::Display) -> Self {
        Self::Internal(msg.to_string())
    }
}
