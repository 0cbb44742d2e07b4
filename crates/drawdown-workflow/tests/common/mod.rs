//! Shared fixtures for workflow integration tests.
//!
//! Tests run the engine over an in-memory libSQL store wrapped in
//! [`FlakyStore`], which can fail audit appends or request updates on demand
//! and can simulate a competing writer.

#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use drawdown_config::WorkflowConfig;
use drawdown_core::entities::{
    AuditEntry, NewAuditEntry, NewWithdrawalRequest, UserProfile, WithdrawalRequest,
};
use drawdown_core::enums::{Region, Role};
use drawdown_core::errors::StoreError;
use drawdown_core::store::{RequestFilter, UserFilter, WorkflowStore};
use drawdown_core::updates::RequestPatch;
use drawdown_db::service::DrawdownService;
use drawdown_workflow::WorkflowEngine;
use drawdown_workflow::form::WithdrawalForm;
use drawdown_workflow::notify::{NotificationContext, NotificationEvent, Notifier};
use drawdown_workflow::permissions::PermissionTable;
use rust_decimal::Decimal;

pub type Engine = WorkflowEngine<FlakyStore, RecordingNotifier>;

// ---------------------------------------------------------------------------
// Store wrapper
// ---------------------------------------------------------------------------

pub struct FlakyStore {
    inner: DrawdownService,
    pub fail_audit: AtomicBool,
    pub fail_update: AtomicBool,
    /// When set, the next update is preceded by a competing write at the
    /// same expected version.
    pub race_next_update: AtomicBool,
}

impl FlakyStore {
    pub const fn new(inner: DrawdownService) -> Self {
        Self {
            inner,
            fail_audit: AtomicBool::new(false),
            fail_update: AtomicBool::new(false),
            race_next_update: AtomicBool::new(false),
        }
    }

    pub const fn inner(&self) -> &DrawdownService {
        &self.inner
    }
}

impl WorkflowStore for FlakyStore {
    async fn get_request(&self, id: &str) -> Result<WithdrawalRequest, StoreError> {
        self.inner.get_request(id).await
    }

    async fn create_request(
        &self,
        request: &NewWithdrawalRequest,
    ) -> Result<WithdrawalRequest, StoreError> {
        self.inner.create_request(request).await
    }

    async fn update_request(
        &self,
        id: &str,
        expected_version: i64,
        patch: &RequestPatch,
    ) -> Result<WithdrawalRequest, StoreError> {
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected update failure".into()));
        }
        if self.race_next_update.swap(false, Ordering::SeqCst) {
            let competing = RequestPatch {
                status: Some("Changed by another reviewer".into()),
                ..RequestPatch::default()
            };
            self.inner
                .update_request(id, expected_version, &competing)
                .await?;
        }
        self.inner.update_request(id, expected_version, patch).await
    }

    async fn list_requests(
        &self,
        filter: &RequestFilter,
    ) -> Result<Vec<WithdrawalRequest>, StoreError> {
        self.inner.list_requests(filter).await
    }

    async fn get_user(&self, id: &str) -> Result<UserProfile, StoreError> {
        self.inner.get_user(id).await
    }

    async fn query_users(&self, filter: &UserFilter) -> Result<Vec<UserProfile>, StoreError> {
        self.inner.query_users(filter).await
    }

    async fn record_assignment(&self, user_id: &str, at: DateTime<Utc>) -> Result<(), StoreError> {
        self.inner.record_assignment(user_id, at).await
    }

    async fn append_audit(&self, entry: &NewAuditEntry) -> Result<AuditEntry, StoreError> {
        if self.fail_audit.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected audit failure".into()));
        }
        self.inner.append_audit(entry).await
    }

    async fn audit_for_request(
        &self,
        request_id: &str,
        limit: u32,
    ) -> Result<Vec<AuditEntry>, StoreError> {
        self.inner.audit_for_request(request_id, limit).await
    }
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sent {
    pub event: NotificationEvent,
    pub recipient: String,
    pub request_id: String,
}

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Sent>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Sent> {
        self.sent.lock().unwrap().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: NotificationEvent, recipient_user_id: &str, context: &NotificationContext) {
        self.sent.lock().unwrap().push(Sent {
            event,
            recipient: recipient_user_id.to_string(),
            request_id: context.request_id.clone(),
        });
    }
}

// ---------------------------------------------------------------------------
// Staff and engine setup
// ---------------------------------------------------------------------------

/// IDs of the seeded directory.
#[derive(Debug, Clone)]
pub struct Staff {
    pub archive: String,
    pub loan_admin: String,
    pub ops_africa: String,
    pub ops_asia: String,
    pub ops_europe: String,
    pub core_banking: String,
    pub admin: String,
    pub observer: String,
}

pub async fn add_user(store: &DrawdownService, name: &str, role: Role, region: Option<Region>) -> String {
    store
        .create_user(name, None, role, region)
        .await
        .unwrap()
        .id
}

/// A directory with one user per role, and an operations reviewer per region.
pub async fn full_staff(store: &DrawdownService) -> Staff {
    Staff {
        archive: add_user(store, "Archie", Role::ArchiveTeam, None).await,
        loan_admin: add_user(store, "Lena", Role::LoanAdministrator, None).await,
        ops_africa: add_user(store, "Kofi", Role::OperationsTeam, Some(Region::Africa)).await,
        ops_asia: add_user(store, "Mei", Role::OperationsTeam, Some(Region::Asia)).await,
        ops_europe: add_user(
            store,
            "Lucia",
            Role::OperationsTeam,
            Some(Region::EuropeLatinAmerica),
        )
        .await,
        core_banking: add_user(store, "Cora", Role::CoreBanking, None).await,
        admin: add_user(store, "Ada", Role::Admin, None).await,
        observer: add_user(store, "Otto", Role::Observer, None).await,
    }
}

pub async fn empty_store() -> FlakyStore {
    FlakyStore::new(DrawdownService::new_local(":memory:").await.unwrap())
}

pub fn engine_with(store: FlakyStore, config: &WorkflowConfig) -> Engine {
    WorkflowEngine::new(store, PermissionTable::standard(), config)
        .with_notifier(RecordingNotifier::default())
}

/// Engine with default config over a fully staffed directory.
pub async fn staffed_engine() -> (Engine, Staff) {
    let store = empty_store().await;
    let staff = full_staff(store.inner()).await;
    (engine_with(store, &WorkflowConfig::default()), staff)
}

pub fn form(country: &str) -> WithdrawalForm {
    WithdrawalForm {
        project_number: "P-3001".into(),
        reference_number: "WD-2026-0042".into(),
        country: country.into(),
        beneficiary_name: "Coastal Roads Authority".into(),
        amount: Decimal::new(125_000_050, 2),
        currency: "usd".into(),
    }
}

pub async fn audit_count(engine: &Engine, request_id: &str) -> usize {
    engine.history(request_id, Some(1000)).await.unwrap().len()
}
