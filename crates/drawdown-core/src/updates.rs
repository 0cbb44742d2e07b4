//! Update payloads for withdrawal requests.
//!
//! Both structs carry `Option` fields; only `Some` fields are written. `FieldsUpdate`
//! is the caller-facing edit of a request's identity fields. `RequestPatch` is what
//! the workflow hands to the store and also covers stage and review fields.
//! `Option<Option<T>>` fields distinguish "leave alone" from "clear".

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::enums::Stage;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beneficiary_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl FieldsUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.project_number.is_none()
            && self.reference_number.is_none()
            && self.beneficiary_name.is_none()
            && self.amount.is_none()
            && self.currency.is_none()
    }

    /// Names of the fields this update touches, in declaration order.
    #[must_use]
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.project_number.is_some() {
            names.push("project_number");
        }
        if self.reference_number.is_some() {
            names.push("reference_number");
        }
        if self.beneficiary_name.is_some() {
            names.push("beneficiary_name");
        }
        if self.amount.is_some() {
            names.push("amount");
        }
        if self.currency.is_some() {
            names.push("currency");
        }
        names
    }
}

#[derive(Default)]
pub struct FieldsUpdateBuilder(FieldsUpdate);

impl FieldsUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(FieldsUpdate::default())
    }

    #[must_use]
    pub fn project_number(mut self, value: impl Into<String>) -> Self {
        self.0.project_number = Some(value.into());
        self
    }

    #[must_use]
    pub fn reference_number(mut self, value: impl Into<String>) -> Self {
        self.0.reference_number = Some(value.into());
        self
    }

    #[must_use]
    pub fn beneficiary_name(mut self, value: impl Into<String>) -> Self {
        self.0.beneficiary_name = Some(value.into());
        self
    }

    #[must_use]
    pub const fn amount(mut self, value: Decimal) -> Self {
        self.0.amount = Some(value);
        self
    }

    #[must_use]
    pub fn currency(mut self, value: impl Into<String>) -> Self {
        self.0.currency = Some(value.into());
        self
    }

    #[must_use]
    pub fn build(self) -> FieldsUpdate {
        self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beneficiary_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_stage: Option<Stage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan_admin_reviewed_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan_admin_reviewed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan_admin_comments: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regional_ops_reviewed_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regional_ops_reviewed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regional_ops_comments: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub core_banking_processed_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub core_banking_processed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<FieldsUpdate> for RequestPatch {
    fn from(update: FieldsUpdate) -> Self {
        Self {
            project_number: update.project_number,
            reference_number: update.reference_number,
            beneficiary_name: update.beneficiary_name,
            amount: update.amount,
            currency: update.currency,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builder_sets_only_given_fields() {
        let update = FieldsUpdateBuilder::new()
            .amount(Decimal::new(12_500, 2))
            .currency("EUR")
            .build();
        assert!(!update.is_empty());
        assert_eq!(update.field_names(), vec!["amount", "currency"]);
        assert!(FieldsUpdate::default().is_empty());
    }

    #[test]
    fn fields_update_serializes_changed_fields_only() {
        let update = FieldsUpdateBuilder::new().beneficiary_name("Acme Ltd").build();
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({ "beneficiary_name": "Acme Ltd" }));
    }

    #[test]
    fn patch_from_fields_update_leaves_workflow_fields_alone() {
        let patch = RequestPatch::from(FieldsUpdateBuilder::new().project_number("P-9").build());
        assert_eq!(patch.project_number.as_deref(), Some("P-9"));
        assert_eq!(patch.current_stage, None);
        assert_eq!(patch.assigned_to, None);
    }
}
