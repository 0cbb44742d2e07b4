use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{AuditAction, Stage};

/// An append-only audit trail entry recording one workflow event.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AuditEntry {
    pub id: String,
    pub request_id: String,
    pub actor_user_id: String,
    pub action: AuditAction,
    pub previous_stage: Option<Stage>,
    pub new_stage: Option<Stage>,
    pub previous_status: Option<String>,
    pub new_status: Option<String>,
    pub amount_involved: Option<Decimal>,
    pub comments: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Audit entry as handed to the store, before it is assigned an ID.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewAuditEntry {
    pub request_id: String,
    pub actor_user_id: String,
    pub action: AuditAction,
    pub previous_stage: Option<Stage>,
    pub new_stage: Option<Stage>,
    pub previous_status: Option<String>,
    pub new_status: Option<String>,
    pub amount_involved: Option<Decimal>,
    pub comments: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl NewAuditEntry {
    /// Attach a store-generated ID.
    #[must_use]
    pub fn into_entry(self, id: String) -> AuditEntry {
        AuditEntry {
            id,
            request_id: self.request_id,
            actor_user_id: self.actor_user_id,
            action: self.action,
            previous_stage: self.previous_stage,
            new_stage: self.new_stage,
            previous_status: self.previous_status,
            new_status: self.new_status,
            amount_involved: self.amount_involved,
            comments: self.comments,
            metadata: self.metadata,
            created_at: self.created_at,
        }
    }
}
