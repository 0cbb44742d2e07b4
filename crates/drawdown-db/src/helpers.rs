//! Row-to-entity parsing helpers.
//!
//! Every repo converts `libsql::Row` (column-indexed) into typed entity structs.
//! These helpers isolate the parsing logic and handle the dual datetime format
//! (`SQLite`'s `datetime('now')` vs Rust's `to_rfc3339()`).

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::error::DatabaseError;

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00+00:00"`) and `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse an optional TEXT column as `Option<DateTime<Utc>>`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string cannot be parsed.
pub fn parse_optional_datetime(s: Option<&str>) -> Result<Option<DateTime<Utc>>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(parse_datetime(s)?)),
        _ => Ok(None),
    }
}

/// Parse a TEXT column into a serde-deserializable enum.
///
/// Works with all drawdown-core enums (`snake_case` wire form).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string does not match any enum variant.
pub fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| DatabaseError::Query(format!("Failed to parse enum from '{s}': {e}")))
}

/// Parse an optional TEXT column into an enum.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string is not a valid variant.
pub fn parse_optional_enum<T: serde::de::DeserializeOwned>(
    s: Option<&str>,
) -> Result<Option<T>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(parse_enum(s)?)),
        _ => Ok(None),
    }
}

/// Parse a TEXT column holding a decimal amount.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string is not a decimal number.
pub fn parse_decimal(s: &str) -> Result<Decimal, DatabaseError> {
    Decimal::from_str(s)
        .map_err(|e| DatabaseError::Query(format!("Failed to parse decimal '{s}': {e}")))
}

/// Parse an optional decimal column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string is not a decimal number.
pub fn parse_optional_decimal(s: Option<&str>) -> Result<Option<Decimal>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(parse_decimal(s)?)),
        _ => Ok(None),
    }
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
/// You must use `get::<Option<String>>()` for nullable columns.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Extract an optional JSON value from a TEXT column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string contains invalid JSON.
pub fn parse_optional_json(s: Option<&str>) -> Result<Option<serde_json::Value>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => {
            let val = serde_json::from_str(s)
                .map_err(|e| DatabaseError::Query(format!("Invalid JSON in column: {e}")))?;
            Ok(Some(val))
        }
        _ => Ok(None),
    }
}

/// Turn an optional string into a SQL value, NULL for `None`.
pub fn opt_text(value: Option<&str>) -> libsql::Value {
    value.map_or(libsql::Value::Null, |s| libsql::Value::Text(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use drawdown_core::enums::Stage;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("2026-02-09T14:30:00+00:00")]
    #[case("2026-02-09T16:30:00+02:00")]
    #[case("2026-02-09 14:30:00")]
    fn stored_timestamps_parse_to_utc(#[case] raw: &str) {
        let expected = DateTime::parse_from_rfc3339("2026-02-09T14:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(parse_datetime(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("yesterday")]
    #[case("2026-02-30 10:00:00")]
    #[case("")]
    fn malformed_timestamps_are_errors(#[case] raw: &str) {
        assert!(parse_datetime(raw).is_err());
    }

    #[test]
    fn empty_optionals_are_none() {
        assert_eq!(parse_optional_datetime(Some("")).unwrap(), None);
        assert_eq!(parse_optional_decimal(None).unwrap(), None);
        assert_eq!(parse_optional_enum::<Stage>(Some("")).unwrap(), None);
        assert_eq!(parse_optional_json(Some("")).unwrap(), None);
    }

    #[test]
    fn parses_stage_and_decimal() {
        let stage: Stage = parse_enum("returned_for_modification").unwrap();
        assert_eq!(stage, Stage::ReturnedForModification);
        assert!(parse_enum::<Stage>("archived").is_err());
        assert_eq!(parse_decimal("1500.25").unwrap(), Decimal::new(150_025, 2));
        assert!(parse_decimal("1,500").is_err());
    }
}
