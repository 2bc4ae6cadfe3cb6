//! # Store Errors
//!
//! Error types for the document store handle.

use thiserror::Error;

use crate::index::IndexError;
use crate::storage::StorageError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Document store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Insert would violate a unique index. Nothing was persisted.
    #[error("Duplicate key in '{collection}' on index '{index}': {key}")]
    DuplicateKey {
        collection: String,
        index: String,
        key: String,
    },

    /// Collection is not part of the catalog the store was opened with
    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    /// Inserted value is not a JSON object
    #[error("Document must be a JSON object")]
    NotAnObject,

    /// Store has been shut down
    #[error("Store is closed")]
    Closed,

    /// Internal lock poisoned by a panicking writer
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Index rebuild failed while replaying storage
    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// True for unique-key violations, the only store error callers may
    /// report with specifics.
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, StoreError::DuplicateKey { .. })
    }

    /// Name of the violated index, when this is a duplicate-key error
    pub fn duplicate_index(&self) -> Option<&str> {
        match self {
            StoreError::DuplicateKey { index, .. } => Some(index),
            _ => None,
        }
    }
}
