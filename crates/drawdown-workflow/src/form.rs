//! Creation form and field validation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use drawdown_core::updates::FieldsUpdate;

use crate::error::WorkflowError;

/// Identity fields captured when an archive team member opens a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalForm {
    pub project_number: String,
    pub reference_number: String,
    pub country: String,
    pub beneficiary_name: String,
    pub amount: Decimal,
    pub currency: String,
}

impl WithdrawalForm {
    /// Check the form and return a copy with trimmed text and an upper-cased
    /// currency code. Country is checked for presence only; routing happens
    /// in the engine.
    ///
    /// # Errors
    ///
    /// `WorkflowError::Validation` naming the first offending field.
    pub fn normalized(&self) -> Result<Self, WorkflowError> {
        Ok(Self {
            project_number: required("project_number", &self.project_number)?,
            reference_number: required("reference_number", &self.reference_number)?,
            country: required("country", &self.country)?,
            beneficiary_name: required("beneficiary_name", &self.beneficiary_name)?,
            amount: positive_amount(self.amount)?,
            currency: currency_code(&self.currency)?,
        })
    }
}

/// Validate and normalize an edit in the same way as a creation form.
///
/// # Errors
///
/// `WorkflowError::Validation` if the update is empty or a field is invalid.
pub fn normalize_update(update: &FieldsUpdate) -> Result<FieldsUpdate, WorkflowError> {
    if update.is_empty() {
        return Err(WorkflowError::validation("update contains no fields"));
    }
    Ok(FieldsUpdate {
        project_number: update
            .project_number
            .as_deref()
            .map(|v| required("project_number", v))
            .transpose()?,
        reference_number: update
            .reference_number
            .as_deref()
            .map(|v| required("reference_number", v))
            .transpose()?,
        beneficiary_name: update
            .beneficiary_name
            .as_deref()
            .map(|v| required("beneficiary_name", v))
            .transpose()?,
        amount: update.amount.map(positive_amount).transpose()?,
        currency: update.currency.as_deref().map(currency_code).transpose()?,
    })
}

fn required(field: &str, value: &str) -> Result<String, WorkflowError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(WorkflowError::validation(format!("{field} must not be empty")));
    }
    Ok(value.to_string())
}

fn positive_amount(amount: Decimal) -> Result<Decimal, WorkflowError> {
    if amount <= Decimal::ZERO {
        return Err(WorkflowError::validation(format!(
            "amount must be positive, got {amount}"
        )));
    }
    Ok(amount)
}

fn currency_code(currency: &str) -> Result<String, WorkflowError> {
    let code = currency.trim().to_ascii_uppercase();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(WorkflowError::validation(format!(
            "currency must be a three-letter code, got '{}'",
            currency.trim()
        )));
    }
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use drawdown_core::updates::FieldsUpdateBuilder;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn form() -> WithdrawalForm {
        WithdrawalForm {
            project_number: " P-100 ".into(),
            reference_number: "REF-1".into(),
            country: "Kenya".into(),
            beneficiary_name: "Nairobi Water".into(),
            amount: Decimal::new(50_000, 0),
            currency: "usd".into(),
        }
    }

    #[test]
    fn normalizes_text_and_currency() {
        let normalized = form().normalized().unwrap();
        assert_eq!(normalized.project_number, "P-100");
        assert_eq!(normalized.currency, "USD");
        assert_eq!(normalized.country, "Kenya");
    }

    #[rstest]
    #[case("0")]
    #[case("-10.5")]
    fn rejects_non_positive_amounts(#[case] amount: &str) {
        let mut f = form();
        f.amount = amount.parse().unwrap();
        assert!(matches!(f.normalized(), Err(WorkflowError::Validation(_))));
    }

    #[rstest]
    #[case("US")]
    #[case("US1")]
    #[case("EURO")]
    #[case("")]
    fn rejects_bad_currency(#[case] currency: &str) {
        let mut f = form();
        f.currency = currency.into();
        assert!(matches!(f.normalized(), Err(WorkflowError::Validation(_))));
    }

    #[test]
    fn rejects_blank_required_field() {
        let mut f = form();
        f.beneficiary_name = "   ".into();
        let err = f.normalized().unwrap_err();
        assert!(err.to_string().contains("beneficiary_name"));
    }

    #[test]
    fn update_is_normalized_field_by_field() {
        let update = FieldsUpdateBuilder::new()
            .currency(" eur ")
            .beneficiary_name(" Acme ")
            .build();
        let normalized = normalize_update(&update).unwrap();
        assert_eq!(normalized.currency.as_deref(), Some("EUR"));
        assert_eq!(normalized.beneficiary_name.as_deref(), Some("Acme"));
        assert_eq!(normalized.amount, None);
    }

    #[test]
    fn empty_update_is_rejected() {
        assert!(matches!(
            normalize_update(&FieldsUpdate::default()),
            Err(WorkflowError::Validation(_))
        ));
        let bad = FieldsUpdateBuilder::new().amount(Decimal::ZERO).build();
        assert!(normalize_update(&bad).is_err());
    }
}
