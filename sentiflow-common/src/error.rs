//! Common error types for Sentiflow

use thiserror::Error;

/// Common result type for Sentiflow operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across Sentiflow services
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Payload could not be decoded (base64, JSON, CSV)
    #[error("Decode error: {0}")]
    Decode(String),

    /// Message transport failure (publish or delivery)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(err.to_string())
    }
}
