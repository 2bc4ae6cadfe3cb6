//! Field constraint violations
//!
//! Each error names the offending field path (e.g. `lessons[2].order`),
//! what was expected and what was found.

use thiserror::Error;

pub type ModelResult<T> = Result<T, ValidationError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field '{field}': expected {expected}, got {actual}")]
pub struct ValidationError {
    pub field: String,
    pub expected: String,
    pub actual: String,
}

impl ValidationError {
    pub fn new(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::new(field, "non-empty value", "missing")
    }

    pub fn not_one_of(field: impl Into<String>, allowed: &[&str], actual: &str) -> Self {
        Self::new(field, format!("one of [{}]", allowed.join(", ")), format!("'{}'", actual))
    }

    pub fn out_of_range(field: impl Into<String>, min: f64, max: f64, actual: f64) -> Self {
        Self::new(field, format!("value within {}..={}", min, max), actual.to_string())
    }

    pub fn invalid_date(field: impl Into<String>, actual: &str) -> Self {
        Self::new(field, "RFC 3339 date", format!("'{}'", actual))
    }
}
