//! Common error types for stem weaver

use thiserror::Error;

/// Common result type for stem weaver operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across stem weaver crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive could not be read or written
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
