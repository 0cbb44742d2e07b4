use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Region, Stage};

/// A withdrawal request moving through the review workflow.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct WithdrawalRequest {
    pub id: String,
    pub project_number: String,
    pub reference_number: String,
    pub country: String,
    pub beneficiary_name: String,
    pub amount: Decimal,
    pub currency: String,
    /// Derived from `country` at creation; never changes afterwards.
    pub region: Region,
    pub current_stage: Stage,
    pub status: String,
    pub assigned_to: Option<String>,
    pub loan_admin_reviewed_by: Option<String>,
    pub loan_admin_reviewed_at: Option<DateTime<Utc>>,
    pub loan_admin_comments: Option<String>,
    pub regional_ops_reviewed_by: Option<String>,
    pub regional_ops_reviewed_at: Option<DateTime<Utc>>,
    pub regional_ops_comments: Option<String>,
    pub core_banking_processed_by: Option<String>,
    pub core_banking_processed_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Bumped on every persisted update; used for compare-and-set writes.
    pub version: i64,
}

/// Insert payload for a new request. The store assigns ID, timestamps, and version.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewWithdrawalRequest {
    pub project_number: String,
    pub reference_number: String,
    pub country: String,
    pub beneficiary_name: String,
    pub amount: Decimal,
    pub currency: String,
    pub region: Region,
    pub current_stage: Stage,
    pub status: String,
    pub assigned_to: Option<String>,
    pub created_by: String,
}
