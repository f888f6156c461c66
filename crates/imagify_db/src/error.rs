//! Error types for the database client

use imagify_common::ImagifyError;
use thiserror::Error;

/// Errors that can occur when working with the database client
#[derive(Debug, Error)]
pub enum DbError {
    /// Error from SQLx
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    /// Error with the database configuration
    #[error("Database configuration error: {0}")]
    ConfigError(String),

    /// Error with database URL parsing
    #[error("Database URL error: {0}")]
    UrlError(String),

    /// Error with database pool creation
    #[error("Database pool error: {0}")]
    PoolError(String),

    /// Error with database query
    #[error("Database query error: {0}")]
    QueryError(String),

    /// Error with database transaction
    #[error("Database transaction error: {0}")]
    TransactionError(String),

    /// A uniqueness constraint rejected the write
    #[error("{0}")]
    UniqueViolation(String),

    /// A stored row could not be mapped back to a record
    #[error("Corrupt row: {0}")]
    CorruptRow(String),

    /// Other errors
    #[error("Other database error: {0}")]
    Other(String),
}

impl DbError {
    /// Maps an insert failure, turning constraint violations into [`DbError::UniqueViolation`].
    pub fn from_insert(err: sqlx::Error, conflict_message: &str) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DbError::UniqueViolation(conflict_message.to_string())
            }
            _ => DbError::QueryError(err.to_string()),
        }
    }
}

impl From<DbError> for ImagifyError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::UniqueViolation(message) => ImagifyError::ConflictError(message),
            DbError::ConfigError(message) | DbError::UrlError(message) => {
                ImagifyError::ConfigError(message)
            }
            other => ImagifyError::DatabaseError(other.to_string()),
        }
    }
}
