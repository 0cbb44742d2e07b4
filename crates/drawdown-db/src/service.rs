//! Service layer over the raw database handle.
//!
//! `DrawdownService` wraps `DrawdownDb`. All repo methods are implemented as
//! `impl DrawdownService` blocks in `repos/`, and the `WorkflowStore` contract
//! is implemented on top of them in `store.rs`.

use crate::DrawdownDb;
use crate::error::DatabaseError;

pub struct DrawdownService {
    db: DrawdownDb,
}

impl DrawdownService {
    /// Open a service over a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path`: Path to the libSQL database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = DrawdownDb::open_local(db_path).await?;
        Ok(Self { db })
    }

    /// Create from an existing `DrawdownDb`.
    #[must_use]
    pub const fn from_db(db: DrawdownDb) -> Self {
        Self { db }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &DrawdownDb {
        &self.db
    }
}
