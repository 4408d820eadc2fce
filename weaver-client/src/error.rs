//! Error types for weaver-client

use thiserror::Error;

/// Failure of a backend call
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with `success: false` or a non-2xx status
    #[error("Server error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body did not have the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Local file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for backend calls
pub type ClientResult<T> = Result<T, ClientError>;
