//! Index error types
//!
//! Error codes:
//! - DAKIA_INDEX_UNIQUE_VIOLATION (ERROR)
//! - DAKIA_INDEX_BUILD_FAILED (FATAL)

use std::fmt;

/// Index error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexErrorCode {
    /// An insert would put a second document under a unique key
    DakiaIndexUniqueViolation,
    /// Rebuilding indexes from storage found conflicting documents
    DakiaIndexBuildFailed,
}

impl IndexErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            IndexErrorCode::DakiaIndexUniqueViolation => "DAKIA_INDEX_UNIQUE_VIOLATION",
            IndexErrorCode::DakiaIndexBuildFailed => "DAKIA_INDEX_BUILD_FAILED",
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, IndexErrorCode::DakiaIndexBuildFailed)
    }
}

impl fmt::Display for IndexErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Index error carrying the offending index and key
#[derive(Debug, Clone)]
pub struct IndexError {
    code: IndexErrorCode,
    index: String,
    key: String,
    message: String,
}

impl IndexError {
    pub fn unique_violation(index: impl Into<String>, key: impl Into<String>) -> Self {
        let index = index.into();
        let key = key.into();
        Self {
            code: IndexErrorCode::DakiaIndexUniqueViolation,
            message: format!("duplicate key {} for unique index '{}'", key, index),
            index,
            key,
        }
    }

    pub fn build_failed(index: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: IndexErrorCode::DakiaIndexBuildFailed,
            index: index.into(),
            key: String::new(),
            message: reason.into(),
        }
    }

    pub fn code(&self) -> IndexErrorCode {
        self.code
    }

    /// Name of the index that rejected the operation
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Rendered key that collided (empty for build failures)
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = if self.code.is_fatal() { "FATAL" } else { "ERROR" };
        write!(f, "[{}] {}: {}", severity, self.code, self.message)
    }
}

impl std::error::Error for IndexError {}

pub type IndexResult<T> = Result<T, IndexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_names_index_and_key() {
        let err = IndexError::unique_violation("email_unique", "\"a@dakia.vn\"");
        assert_eq!(err.index(), "email_unique");
        assert_eq!(err.key(), "\"a@dakia.vn\"");
        assert!(!err.code().is_fatal());
        assert!(err.to_string().contains("DAKIA_INDEX_UNIQUE_VIOLATION"));
    }

    #[test]
    fn test_build_failure_is_fatal() {
        let err = IndexError::build_failed("slug_unique", "conflicting documents in storage");
        assert!(err.code().is_fatal());
        assert!(err.to_string().starts_with("[FATAL]"));
    }
}
