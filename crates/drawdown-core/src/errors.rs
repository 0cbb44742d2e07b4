//! Cross-cutting error types for Drawdown.
//!
//! `StoreError` is the error half of the [`WorkflowStore`](crate::store::WorkflowStore)
//! contract. Backends convert their own errors into it; the workflow engine
//! inspects `NotFound` and `Conflict` and wraps everything else.

use thiserror::Error;

/// Errors a storage backend can report to the workflow.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// A compare-and-set update lost against a concurrent writer.
    #[error("Version conflict on {id}: expected version {expected_version}")]
    Conflict { id: String, expected_version: i64 },

    /// Stored data could not be decoded into a domain type.
    #[error("Corrupt record: {0}")]
    Corrupt(String),

    /// The backend itself failed (connection, SQL, I/O).
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StoreError {
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
