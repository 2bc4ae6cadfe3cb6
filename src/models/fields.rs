//! Shared normalization helpers for document fields

use chrono::{DateTime, SecondsFormat, Utc};

use super::errors::{ModelResult, ValidationError};

/// Field path inside a nested document, e.g. `lessons[0].id`
pub(crate) fn path(prefix: &str, index: usize, field: &str) -> String {
    format!("{}[{}].{}", prefix, index, field)
}

/// A required string: present and non-blank. Returned trimmed when `trim`.
pub(crate) fn required(field: &str, value: Option<String>, trim: bool) -> ModelResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(if trim { v.trim().to_string() } else { v }),
        _ => Err(ValidationError::missing_field(field)),
    }
}

/// An optional trimmed string; blank collapses to absent.
pub(crate) fn optional_trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Checks `value` against an enumerated set, falling back to `default`.
pub(crate) fn one_of(
    field: &str,
    value: Option<String>,
    allowed: &[&'static str],
    default: &'static str,
) -> ModelResult<&'static str> {
    match value {
        None => Ok(default),
        Some(v) => allowed
            .iter()
            .copied()
            .find(|a| *a == v)
            .ok_or_else(|| ValidationError::not_one_of(field, allowed, &v)),
    }
}

/// Normalizes a date to RFC 3339 UTC with milliseconds, or stamps `now`.
pub(crate) fn timestamp_or(field: &str, value: Option<String>, now: &str) -> ModelResult<String> {
    match value {
        None => Ok(now.to_string()),
        Some(v) => normalize_timestamp(field, &v),
    }
}

pub(crate) fn normalize_timestamp(field: &str, value: &str) -> ModelResult<String> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| {
            dt.with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Millis, true)
        })
        .map_err(|_| ValidationError::invalid_date(field, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims_on_request() {
        assert_eq!(required("title", Some("  AI  ".into()), true).unwrap(), "AI");
        assert_eq!(required("description", Some(" text ".into()), false).unwrap(), " text ");
        assert!(required("title", Some("   ".into()), true).is_err());
        assert!(required("title", None, true).is_err());
    }

    #[test]
    fn test_optional_trimmed() {
        assert_eq!(optional_trimmed(Some(" IT ".into())), Some("IT".to_string()));
        assert_eq!(optional_trimmed(Some("  ".into())), None);
        assert_eq!(optional_trimmed(None), None);
    }

    #[test]
    fn test_one_of() {
        let allowed = ["admin", "user"];
        assert_eq!(one_of("role", None, &allowed, "user").unwrap(), "user");
        assert_eq!(one_of("role", Some("admin".into()), &allowed, "user").unwrap(), "admin");
        assert!(one_of("role", Some("Admin".into()), &allowed, "user").is_err());
    }

    #[test]
    fn test_timestamps_normalize_to_utc_millis() {
        assert_eq!(
            normalize_timestamp("issuedAt", "2026-05-01T09:00:00+07:00").unwrap(),
            "2026-05-01T02:00:00.000Z"
        );
        assert!(normalize_timestamp("issuedAt", "yesterday").is_err());
        assert_eq!(timestamp_or("issuedAt", None, "NOW").unwrap(), "NOW");
    }
}
