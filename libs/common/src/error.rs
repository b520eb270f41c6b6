//! Error types for database operations

use thiserror::Error;

/// Errors that can occur during database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to connect to the database
    #[error("Database connection error: {0}")]
    Connection(#[source] sqlx::Error),

    /// A query failed to execute
    #[error("Database query error: {0}")]
    Query(#[source] sqlx::Error),

    /// Migration failed to apply
    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Configuration is invalid
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

/// Result type alias for database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;
