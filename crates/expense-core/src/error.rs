//! Error types for expense-core

use rusqlite::ErrorCode;
use thiserror::Error;

/// Result type alias using expense-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in expense-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// The database handle was closed before use
    #[error("Database is not open")]
    NotOpen,

    /// Underlying store missing, locked, or not a database
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// UNIQUE / NOT NULL constraint failure (duplicate server id or hash)
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Any other `SQLite` failure
    #[error("Query failed: {0}")]
    Query(rusqlite::Error),

    /// Schema version newer than this build understands
    #[error("Unsupported schema version: {0}")]
    UnsupportedSchemaVersion(i32),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether the store itself could not be reached (closed, locked, missing).
    pub const fn is_storage_unavailable(&self) -> bool {
        matches!(self, Self::NotOpen | Self::StorageUnavailable(_))
    }
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        match error.sqlite_error_code() {
            Some(ErrorCode::ConstraintViolation) => Self::ConstraintViolation(error.to_string()),
            Some(
                ErrorCode::CannotOpen
                | ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::NotADatabase
                | ErrorCode::ReadOnly,
            ) => Self::StorageUnavailable(error.to_string()),
            _ => Self::Query(error),
        }
    }
}
