//! Workflow error and warning types.

use drawdown_core::enums::{Region, Stage};
use drawdown_core::errors::StoreError;
use serde::Serialize;
use thiserror::Error;

/// Errors that abort a workflow operation.
///
/// Every variant except `Conflict` and `Store` is raised before anything is
/// persisted.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Unsupported country: {country}")]
    UnsupportedCountry { country: String },

    #[error("Withdrawal request not found: {id}")]
    NotFound { id: String },

    /// The actor is unknown, inactive, or their role may not act here.
    #[error("User {actor} is not authorized: {reason}")]
    Unauthorized { actor: String, reason: String },

    #[error("No eligible assignee for {stage} in {region}")]
    AssignmentFailure { stage: Stage, region: Region },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Request {id} is {stage} and cannot be changed")]
    InvalidTransition { id: String, stage: Stage },

    /// Another writer updated the request after it was read.
    #[error("Request {id} was modified concurrently (expected version {expected_version})")]
    Conflict { id: String, expected_version: i64 },

    #[error("Storage error: {0}")]
    Store(StoreError),
}

impl WorkflowError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unauthorized(actor: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            actor: actor.into(),
            reason: reason.into(),
        }
    }
}

impl From<StoreError> for WorkflowError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity_type, id } if entity_type == "withdrawal_request" => {
                Self::NotFound { id }
            }
            StoreError::Conflict {
                id,
                expected_version,
            } => Self::Conflict {
                id,
                expected_version,
            },
            other => Self::Store(other),
        }
    }
}

/// Advisory problems reported alongside a committed change.
#[derive(Debug, Clone, Error, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorkflowWarning {
    /// The change was persisted but its audit entry was not written.
    #[error("Audit entry for {request_id} ({action}) was not written: {reason}")]
    AuditWriteFailure {
        request_id: String,
        action: String,
        reason: String,
    },

    /// The assignee's `last_assigned_at` could not be stamped.
    #[error("Assignment of {user_id} was not recorded: {reason}")]
    AssignmentNotRecorded { user_id: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_not_found_maps_to_not_found() {
        let err: WorkflowError = StoreError::not_found("withdrawal_request", "wdr-1").into();
        assert!(matches!(err, WorkflowError::NotFound { ref id } if id == "wdr-1"));
    }

    #[test]
    fn other_not_found_stays_a_store_error() {
        let err: WorkflowError = StoreError::not_found("user", "usr-1").into();
        assert!(matches!(err, WorkflowError::Store(StoreError::NotFound { .. })));
    }

    #[test]
    fn conflict_is_preserved() {
        let err: WorkflowError = StoreError::Conflict {
            id: "wdr-1".into(),
            expected_version: 3,
        }
        .into();
        assert!(matches!(
            err,
            WorkflowError::Conflict {
                expected_version: 3,
                ..
            }
        ));
    }

    #[test]
    fn warning_wire_shape() {
        let warning = WorkflowWarning::AuditWriteFailure {
            request_id: "wdr-1".into(),
            action: "approved".into(),
            reason: "disk full".into(),
        };
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["kind"], "audit_write_failure");
        assert_eq!(json["reason"], "disk full");
    }
}
