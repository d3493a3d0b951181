//! Common error types for phylocolor

use thiserror::Error;

/// Common result type for phylocolor operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the phylocolor crates
#[derive(Error, Debug)]
pub enum Error {
    /// Reference database error (wraps sqlx::Error)
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

    /// Invalid caller input (usage error)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
