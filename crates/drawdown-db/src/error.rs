//! Database error types for drawdown-db.

use drawdown_core::errors::StoreError;
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed or returned undecodable data.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// A conditional update matched the row but not its version.
    #[error("Version conflict on {id}: expected version {expected_version}")]
    Conflict { id: String, expected_version: i64 },

    /// Invalid state encountered (e.g., bad data in DB).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<DatabaseError> for StoreError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Conflict {
                id,
                expected_version,
            } => Self::Conflict {
                id,
                expected_version,
            },
            DatabaseError::Query(msg) | DatabaseError::InvalidState(msg) => Self::Corrupt(msg),
            DatabaseError::NoResult => Self::Backend("no result returned".into()),
            DatabaseError::Migration(msg) => Self::Backend(format!("migration failed: {msg}")),
            DatabaseError::LibSql(e) => Self::Backend(e.to_string()),
            DatabaseError::Other(e) => Self::Other(e),
        }
    }
}
