//! Shared fixtures for drawdown-db unit tests.

pub(crate) mod helpers {
    use drawdown_core::entities::NewWithdrawalRequest;
    use drawdown_core::enums::{Region, Stage};
    use rust_decimal::Decimal;

    use crate::service::DrawdownService;

    pub(crate) async fn test_service() -> DrawdownService {
        DrawdownService::new_local(":memory:")
            .await
            .expect("in-memory database should open")
    }

    pub(crate) fn sample_new_request(country: &str, region: Region) -> NewWithdrawalRequest {
        NewWithdrawalRequest {
            project_number: "P-1001".into(),
            reference_number: "REF-2026-001".into(),
            country: country.into(),
            beneficiary_name: "Acme Water Works".into(),
            amount: Decimal::new(1_500_000, 2),
            currency: "USD".into(),
            region,
            current_stage: Stage::UnderLoanReview,
            status: "Pending loan administrator review".into(),
            assigned_to: Some("usr-00000001".into()),
            created_by: "usr-00000009".into(),
        }
    }
}
