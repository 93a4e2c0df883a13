//! Error types for sitecache-core

use thiserror::Error;

/// Result type alias using sitecache-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sitecache-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// `SQLite` error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Account, blog or post not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A staged merge plan no longer matches the stored graph
    #[error("Validation failed: {0}")]
    Validation(String),
}
