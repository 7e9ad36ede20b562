//! Common error types for the signage workspace

use thiserror::Error;

/// Common result type for signage operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors shared by the asset store, configuration and date handling
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

    /// A date string did not match the expected format
    #[error("Invalid date '{value}' (expected {format})")]
    InvalidDate { value: String, format: &'static str },
}
