//! Embedded document store
//!
//! Schema-flexible JSON documents grouped into named collections, with
//! unique, secondary and compound indexes. Each call is one atomic read or
//! one single-document write; the store owns no background work.
//!
//! ```ignore
//! let store = DocumentStore::open(data_dir, &catalog)?;
//! let doc = store.insert("courses", json!({"slug": "ai-for-sales"}))?;
//! let latest = store.find(
//!     "courses",
//!     &Query::new().sort(SortSpec::desc("createdAt")).limit(50),
//! )?;
//! store.shutdown()?;
//! ```

mod collection;
mod document_store;
mod errors;
mod query;

pub use collection::CollectionSpec;
pub use document_store::{timestamp_now, DocumentStore, CLEAN_SHUTDOWN_MARKER};
pub use errors::{StoreError, StoreResult};
pub use query::{compare_values, matches_all, Predicate, Projection, Query, SortDirection, SortSpec};
