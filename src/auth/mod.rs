//! # Auth Module
//!
//! One-way password hashing for user documents. Session handling and login
//! flows live outside this crate.

pub mod crypto;
pub mod errors;

pub use crypto::{hash_password, verify_password};
pub use errors::{AuthError, AuthResult};
