//! Typed audit metadata payloads.
//!
//! Each audit entry can carry a structured `metadata` JSON blob. These types
//! give the common shapes a schema.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Decision, FallbackLevel, Region, Role};

/// Who a request was handed to, and how far down the fallback chain we went.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AssignmentDetail {
    pub assignee: String,
    pub fallback: FallbackLevel,
    /// Role the stage ideally wants, absent for the terminal stage.
    pub required_role: Option<Role>,
    pub region: Region,
}

/// Metadata for `Submitted`/`Approved`/`Rejected`/`Disbursed` entries.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TransitionDetail {
    pub decision: Decision,
    pub actor_role: Role,
    /// `None` once the request reaches the terminal stage.
    pub assignment: Option<AssignmentDetail>,
    pub version: i64,
}

/// Metadata for `Created` entries.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CreatedDetail {
    pub country: String,
    pub region: Region,
    pub draft: bool,
    pub assignment: AssignmentDetail,
}

/// Metadata for `Updated` entries: the names of changed fields plus the
/// previous and new values.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FieldsUpdatedDetail {
    pub fields: Vec<String>,
    pub before: serde_json::Value,
    pub after: serde_json::Value,
}
