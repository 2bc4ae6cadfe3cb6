//! # Auth Errors

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// Nothing to hash
    #[error("Password must not be empty")]
    EmptyPassword,

    /// The hasher itself failed (parameter or RNG failure)
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(AuthError::EmptyPassword.to_string(), "Password must not be empty");
        assert!(AuthError::HashingFailed("rng".into()).to_string().contains("rng"));
    }
}
