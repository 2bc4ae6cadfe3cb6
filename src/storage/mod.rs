//! Document record file backing the store
//!
//! Append-only, one checksummed record per inserted document. The file is
//! the durable source of truth; collections and indexes are rebuilt from it
//! whenever the store opens.

mod errors;
mod reader;
mod record;
mod writer;

pub use errors::{Severity, StorageError, StorageErrorCode, StorageResult};
pub use reader::StorageReader;
pub use record::{compute_checksum, DocumentRecord};
pub use writer::StorageWriter;
