//! Validation engine for inbound submissions.
//!
//! Validates the raw JSON payload against the submission schema and either
//! normalizes it into a [`NewApplication`] or returns the complete list of
//! field-level violations. All rules are evaluated unconditionally (no
//! short-circuiting at the first failure) so the caller gets actionable
//! feedback in one round trip, and so test assertions are deterministic.
//! Violations are reported in schema declaration order.

use crate::types::NewApplication;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Loose RFC 5322 profile: printable local part, dotted domain, ASCII TLD.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email regex")
});

/// A single schema violation: the offending field path and a human-readable
/// message.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validates a raw submission payload against the schema.
///
/// Required: `firstName`, `lastName` non-empty strings; `email` matching the
/// email grammar; `year` an integer within `[min_year, max_year]`. Unknown
/// fields are ignored.
///
/// # Errors
///
/// Returns every violation found, in schema order. No partial normalization
/// is returned on failure.
pub fn validate(
    payload: &Value,
    min_year: i32,
    max_year: i32,
) -> Result<NewApplication, Vec<FieldError>> {
    let mut errors = Vec::new();

    let first_name = required_string(payload, "firstName", &mut errors);
    let last_name = required_string(payload, "lastName", &mut errors);

    let email = required_string(payload, "email", &mut errors).and_then(|email| {
        if EMAIL_RE.is_match(&email) {
            Some(email)
        } else {
            errors.push(FieldError::new("email", "email must be a valid email"));
            None
        }
    });

    let year = match payload.get("year") {
        None | Some(Value::Null) => {
            errors.push(FieldError::new("year", "year is a required field"));
            None
        }
        Some(value) => match value.as_i64() {
            Some(year) if (i64::from(min_year)..=i64::from(max_year)).contains(&year) => {
                Some(year as i32)
            }
            Some(_) => {
                errors.push(FieldError::new(
                    "year",
                    format!("year must be between {min_year} and {max_year}"),
                ));
                None
            }
            None => {
                errors.push(FieldError::new("year", "year must be an integer"));
                None
            }
        },
    };

    match (first_name, last_name, email, year) {
        (Some(first_name), Some(last_name), Some(email), Some(year)) if errors.is_empty() => {
            Ok(NewApplication {
                first_name,
                last_name,
                email,
                year,
            })
        }
        _ => Err(errors),
    }
}

/// Extracts a required non-empty string field, recording a violation on
/// absence, wrong type, or emptiness after trimming.
fn required_string(payload: &Value, field: &'static str, errors: &mut Vec<FieldError>) -> Option<String> {
    match payload.get(field) {
        None | Some(Value::Null) => {
            errors.push(FieldError::new(field, format!("{field} is a required field")));
            None
        }
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                errors.push(FieldError::new(field, format!("{field} is a required field")));
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Some(_) => {
            errors.push(FieldError::new(field, format!("{field} must be a string")));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const MIN_YEAR: i32 = 2025;
    const MAX_YEAR: i32 = 2030;

    fn check(payload: Value) -> Result<NewApplication, Vec<FieldError>> {
        validate(&payload, MIN_YEAR, MAX_YEAR)
    }

    #[test]
    fn accepts_a_complete_submission() {
        let app = check(json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "year": 2026,
        }))
        .unwrap();
        assert_eq!(app.first_name, "Ada");
        assert_eq!(app.last_name, "Lovelace");
        assert_eq!(app.email, "ada@example.com");
        assert_eq!(app.year, 2026);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let app = check(json!({
            "firstName": "  Ada ",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "year": 2025,
        }))
        .unwrap();
        assert_eq!(app.first_name, "Ada");
    }

    #[test]
    fn reports_every_missing_field_in_schema_order() {
        let errors = check(json!({})).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, ["firstName", "lastName", "email", "year"]);
        assert!(errors.iter().all(|e| e.message.ends_with("is a required field")));
    }

    #[test]
    fn reports_exactly_the_invalid_fields() {
        let errors = check(json!({
            "firstName": "Ada",
            "lastName": "",
            "email": "not-an-email",
            "year": 2026,
        }))
        .unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, ["lastName", "email"]);
    }

    #[test]
    fn rejects_malformed_emails() {
        for bad in ["plain", "a@b", "a @b.com", "@example.com", "a@.com"] {
            let errors = check(json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": bad,
                "year": 2026,
            }))
            .unwrap_err();
            assert_eq!(errors.len(), 1, "expected one error for {bad:?}");
            assert_eq!(errors[0].field, "email");
        }
    }

    #[test]
    fn rejects_years_outside_the_admission_range() {
        for year in [MIN_YEAR - 1, MAX_YEAR + 1, 0, -2026] {
            let errors = check(json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com",
                "year": year,
            }))
            .unwrap_err();
            assert_eq!(errors[0].field, "year");
            assert!(errors[0].message.contains("between"));
        }
    }

    #[test]
    fn accepts_the_range_endpoints() {
        for year in [MIN_YEAR, MAX_YEAR] {
            assert!(
                check(json!({
                    "firstName": "Ada",
                    "lastName": "Lovelace",
                    "email": "ada@example.com",
                    "year": year,
                }))
                .is_ok()
            );
        }
    }

    #[test]
    fn rejects_non_integer_years() {
        for year in [json!("2026"), json!(2026.5), json!(true)] {
            let errors = check(json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com",
                "year": year,
            }))
            .unwrap_err();
            assert_eq!(errors[0].field, "year");
        }
    }

    #[test]
    fn rejects_wrongly_typed_names() {
        let errors = check(json!({
            "firstName": 42,
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "year": 2026,
        }))
        .unwrap_err();
        assert_eq!(errors[0].field, "firstName");
        assert_eq!(errors[0].message, "firstName must be a string");
    }
}
