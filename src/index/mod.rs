//! In-memory indexes for the document store
//!
//! Indexes are derived state: they are never persisted and are rebuilt from
//! the record file every time the store opens. BTreeMap ordering keeps
//! lookups deterministic.

mod btree;
mod errors;
mod manager;

pub use btree::{DocumentSeq, IndexKey, IndexTree};
pub use errors::{IndexError, IndexErrorCode, IndexResult};
pub use manager::{IndexManager, IndexSpec};
