//! Audit logger over the store's append-only trail.
//!
//! Writes are advisory: a failed append is logged and reported as `false`
//! so the caller can attach a warning without undoing the change it records.

use drawdown_core::entities::{AuditEntry, NewAuditEntry};
use drawdown_core::errors::StoreError;
use drawdown_core::store::WorkflowStore;

pub struct AuditLogger<'s, S> {
    store: &'s S,
}

impl<'s, S: WorkflowStore> AuditLogger<'s, S> {
    pub const fn new(store: &'s S) -> Self {
        Self { store }
    }

    /// Append `entry`. Returns `true` on success.
    pub async fn append(&self, entry: &NewAuditEntry) -> bool {
        self.try_append(entry).await.is_ok()
    }

    /// Append `entry`, handing back the stored record or the failure.
    ///
    /// Failures are logged here; callers only decide how to surface them.
    pub async fn try_append(&self, entry: &NewAuditEntry) -> Result<AuditEntry, StoreError> {
        match self.store.append_audit(entry).await {
            Ok(stored) => {
                tracing::debug!(
                    audit_id = %stored.id,
                    request_id = %stored.request_id,
                    action = %stored.action,
                    "audit entry written"
                );
                Ok(stored)
            }
            Err(e) => {
                tracing::warn!(
                    request_id = %entry.request_id,
                    action = %entry.action,
                    error = %e,
                    "audit entry not written"
                );
                Err(e)
            }
        }
    }

    /// Entries for `request_id`, newest first.
    ///
    /// # Errors
    ///
    /// Propagates store read failures.
    pub async fn history(
        &self,
        request_id: &str,
        limit: u32,
    ) -> Result<Vec<AuditEntry>, StoreError> {
        self.store.audit_for_request(request_id, limit).await
    }
}
