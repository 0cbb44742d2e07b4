use std::str::FromStr;

use anyhow::Context;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;

/// Parse a snake_case enum value using serde-deserialization.
///
/// Hyphens are accepted in place of underscores (`operations-team`).
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
    serde_json::from_value(serde_json::Value::String(normalized))
        .map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// Parse an optional enum flag.
pub fn parse_opt_enum<T>(raw: Option<&str>, field: &str) -> anyhow::Result<Option<T>>
where
    T: DeserializeOwned,
{
    raw.map(|value| parse_enum(value, field)).transpose()
}

/// Parse a decimal amount such as `1250000.50`. Thousands separators are
/// not accepted.
pub fn parse_amount(raw: &str) -> anyhow::Result<Decimal> {
    Decimal::from_str(raw.trim()).with_context(|| format!("invalid amount '{raw}'"))
}

#[cfg(test)]
mod tests {
    use drawdown_core::enums::{Region, Role, Stage};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    use super::{parse_amount, parse_enum, parse_opt_enum};

    #[test]
    fn parses_snake_case_enum() {
        let stage: Stage = parse_enum("under_loan_review", "stage").expect("stage should parse");
        assert_eq!(stage, Stage::UnderLoanReview);
    }

    #[test]
    fn parses_hyphenated_and_upper_case() {
        let role: Role = parse_enum("Operations-Team", "role").expect("role should parse");
        assert_eq!(role, Role::OperationsTeam);
    }

    #[test]
    fn errors_on_invalid_enum() {
        let err = parse_enum::<Region>("oceania", "region").expect_err("should fail");
        assert!(err.to_string().contains("invalid region 'oceania'"));
    }

    #[test]
    fn optional_enum_passes_none_through() {
        assert_eq!(parse_opt_enum::<Region>(None, "region").unwrap(), None);
        assert_eq!(
            parse_opt_enum::<Region>(Some("asia"), "region").unwrap(),
            Some(Region::Asia)
        );
    }

    #[test]
    fn parses_amounts() {
        assert_eq!(parse_amount(" 1250000.50 ").unwrap(), Decimal::new(125_000_050, 2));
        assert!(parse_amount("1,000").is_err());
    }
}
