//! Storage contract consumed by the workflow engine.
//!
//! The workflow never talks to a database directly. It reads requests and the
//! user directory, writes request patches, and appends audit entries through
//! this trait. `drawdown-db` provides the libSQL implementation.

use chrono::{DateTime, Utc};

use crate::entities::{
    AuditEntry, NewAuditEntry, NewWithdrawalRequest, UserProfile, WithdrawalRequest,
};
use crate::enums::{Region, Role, Stage};
use crate::errors::StoreError;
use crate::updates::RequestPatch;

/// Filter for user directory queries. `None` fields do not constrain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub role: Option<Role>,
    pub regional_assignment: Option<Region>,
    pub active_only: bool,
}

impl UserFilter {
    /// Active users holding `role`.
    #[must_use]
    pub const fn active_with_role(role: Role) -> Self {
        Self {
            role: Some(role),
            regional_assignment: None,
            active_only: true,
        }
    }

    /// Any active user.
    #[must_use]
    pub const fn any_active() -> Self {
        Self {
            role: None,
            regional_assignment: None,
            active_only: true,
        }
    }

    #[must_use]
    pub const fn in_region(mut self, region: Region) -> Self {
        self.regional_assignment = Some(region);
        self
    }
}

/// Filter for request listings. Results are newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFilter {
    pub stage: Option<Stage>,
    pub region: Option<Region>,
    pub assigned_to: Option<String>,
    pub created_by: Option<String>,
    pub limit: Option<u32>,
}

/// Persistence operations the workflow depends on.
///
/// Implementations must apply `update_request` as a compare-and-set on
/// `expected_version`, returning `StoreError::Conflict` when the stored version
/// differs, and must bump the version on success.
#[allow(async_fn_in_trait)]
pub trait WorkflowStore {
    async fn get_request(&self, id: &str) -> Result<WithdrawalRequest, StoreError>;

    async fn create_request(
        &self,
        request: &NewWithdrawalRequest,
    ) -> Result<WithdrawalRequest, StoreError>;

    async fn update_request(
        &self,
        id: &str,
        expected_version: i64,
        patch: &RequestPatch,
    ) -> Result<WithdrawalRequest, StoreError>;

    async fn list_requests(
        &self,
        filter: &RequestFilter,
    ) -> Result<Vec<WithdrawalRequest>, StoreError>;

    async fn get_user(&self, id: &str) -> Result<UserProfile, StoreError>;

    async fn query_users(&self, filter: &UserFilter) -> Result<Vec<UserProfile>, StoreError>;

    /// Stamp `last_assigned_at` on a user who just received a request.
    async fn record_assignment(&self, user_id: &str, at: DateTime<Utc>)
    -> Result<(), StoreError>;

    async fn append_audit(&self, entry: &NewAuditEntry) -> Result<AuditEntry, StoreError>;

    /// Audit entries for one request, newest first.
    async fn audit_for_request(
        &self,
        request_id: &str,
        limit: u32,
    ) -> Result<Vec<AuditEntry>, StoreError>;
}
