//! `WorkflowStore` implementation over the libSQL repos.

use chrono::{DateTime, Utc};

use drawdown_core::entities::{
    AuditEntry, NewAuditEntry, NewWithdrawalRequest, UserProfile, WithdrawalRequest,
};
use drawdown_core::errors::StoreError;
use drawdown_core::store::{RequestFilter, UserFilter, WorkflowStore};
use drawdown_core::updates::RequestPatch;

use crate::error::DatabaseError;
use crate::repos::audit::AuditFilter;
use crate::service::DrawdownService;

/// Map `NoResult` to a typed `NotFound` carrying the entity and ID.
fn lookup_error(entity_type: &str, id: &str) -> impl FnOnce(DatabaseError) -> StoreError {
    move |err| match err {
        DatabaseError::NoResult => StoreError::not_found(entity_type, id),
        other => other.into(),
    }
}

impl WorkflowStore for DrawdownService {
    async fn get_request(&self, id: &str) -> Result<WithdrawalRequest, StoreError> {
        self.find_request(id)
            .await
            .map_err(lookup_error("withdrawal_request", id))
    }

    async fn create_request(
        &self,
        request: &NewWithdrawalRequest,
    ) -> Result<WithdrawalRequest, StoreError> {
        Ok(self.insert_request(request).await?)
    }

    async fn update_request(
        &self,
        id: &str,
        expected_version: i64,
        patch: &RequestPatch,
    ) -> Result<WithdrawalRequest, StoreError> {
        self.patch_request(id, expected_version, patch)
            .await
            .map_err(lookup_error("withdrawal_request", id))
    }

    async fn list_requests(
        &self,
        filter: &RequestFilter,
    ) -> Result<Vec<WithdrawalRequest>, StoreError> {
        Ok(self.list_requests_filtered(filter).await?)
    }

    async fn get_user(&self, id: &str) -> Result<UserProfile, StoreError> {
        self.find_user(id).await.map_err(lookup_error("user", id))
    }

    async fn query_users(&self, filter: &UserFilter) -> Result<Vec<UserProfile>, StoreError> {
        Ok(self.list_users(filter).await?)
    }

    async fn record_assignment(
        &self,
        user_id: &str,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.touch_last_assigned(user_id, at)
            .await
            .map_err(lookup_error("user", user_id))
    }

    async fn append_audit(&self, entry: &NewAuditEntry) -> Result<AuditEntry, StoreError> {
        Ok(self.insert_audit(entry).await?)
    }

    async fn audit_for_request(
        &self,
        request_id: &str,
        limit: u32,
    ) -> Result<Vec<AuditEntry>, StoreError> {
        let filter = AuditFilter {
            request_id: Some(request_id.to_string()),
            limit: Some(limit),
            ..AuditFilter::default()
        };
        Ok(self.query_audit(&filter).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{sample_new_request, test_service};
    use drawdown_core::enums::Region;

    #[tokio::test]
    async fn missing_request_maps_to_not_found() {
        let svc = test_service().await;
        let err = WorkflowStore::get_request(&svc, "wdr-00000000")
            .await
            .unwrap_err();
        assert!(
            matches!(err, StoreError::NotFound { ref entity_type, ref id }
                if entity_type == "withdrawal_request" && id == "wdr-00000000")
        );
    }

    #[tokio::test]
    async fn missing_user_maps_to_not_found() {
        let svc = test_service().await;
        let err = WorkflowStore::get_user(&svc, "usr-00000000")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        let err = svc.record_assignment("usr-00000000", Utc::now()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn stale_update_maps_to_conflict() {
        let svc = test_service().await;
        let created = WorkflowStore::create_request(&svc, &sample_new_request("kenya", Region::Africa))
            .await
            .unwrap();
        let patch = RequestPatch {
            status: Some("x".into()),
            ..RequestPatch::default()
        };
        svc.update_request(&created.id, created.version, &patch)
            .await
            .unwrap();
        let err = svc
            .update_request(&created.id, created.version, &patch)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict { expected_version: 1, .. }));
    }
}
