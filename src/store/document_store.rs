//! The document store handle
//!
//! Constructed once at process start and shared as `Arc<DocumentStore>`.
//! Opening replays the record file into memory; `shutdown()` marks a clean
//! stop and rejects any further writes.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::index::IndexError;
use crate::observability::{log_event, log_event_with_fields, Event};
use crate::storage::{DocumentRecord, StorageReader, StorageWriter};

use super::collection::{Collection, CollectionSpec};
use super::errors::{StoreError, StoreResult};
use super::query::{Predicate, Query};

/// Name of the marker written by a clean shutdown
pub const CLEAN_SHUTDOWN_MARKER: &str = "clean_shutdown";

/// Current time as RFC 3339 UTC with millisecond precision, e.g.
/// `2026-10-18T08:30:00.123Z`
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

struct StoreState {
    collections: HashMap<String, Collection>,
    writer: Option<StorageWriter>,
    closed: bool,
}

/// Embedded document store
pub struct DocumentStore {
    state: RwLock<StoreState>,
    data_dir: Option<PathBuf>,
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore")
            .field("data_dir", &self.data_dir)
            .finish_non_exhaustive()
    }
}

impl DocumentStore {
    /// Opens a persistent store rooted at `data_dir`.
    ///
    /// Replays `data/documents.dat` into collections and indexes. Any
    /// corrupt record or replayed unique-key conflict aborts the open.
    pub fn open(data_dir: &Path, catalog: &[CollectionSpec]) -> StoreResult<Self> {
        let marker = data_dir.join(CLEAN_SHUTDOWN_MARKER);
        let clean = marker.exists();
        if clean {
            fs::remove_file(&marker)?;
        }

        let mut collections = Self::empty_collections(catalog);
        let storage_path = data_dir.join("data").join("documents.dat");
        let mut replayed = 0usize;

        if storage_path.exists() {
            let mut reader = StorageReader::open(&storage_path)?;
            while let Some(record) = reader.read_next()? {
                Self::replay_record(&mut collections, record)?;
                replayed += 1;
            }
        }

        log_event_with_fields(
            Event::StoreReplayComplete,
            &[
                ("clean_shutdown", if clean { "true" } else { "false" }),
                ("records", &replayed.to_string()),
            ],
        );

        let writer = StorageWriter::open(data_dir)?;
        log_event_with_fields(
            Event::StoreOpened,
            &[("data_dir", &data_dir.display().to_string())],
        );

        Ok(Self {
            state: RwLock::new(StoreState {
                collections,
                writer: Some(writer),
                closed: false,
            }),
            data_dir: Some(data_dir.to_path_buf()),
        })
    }

    /// Opens a store that keeps everything in memory.
    pub fn in_memory(catalog: &[CollectionSpec]) -> Self {
        Self {
            state: RwLock::new(StoreState {
                collections: Self::empty_collections(catalog),
                writer: None,
                closed: false,
            }),
            data_dir: None,
        }
    }

    fn empty_collections(catalog: &[CollectionSpec]) -> HashMap<String, Collection> {
        catalog
            .iter()
            .map(|spec| (spec.name.clone(), Collection::new(spec)))
            .collect()
    }

    fn replay_record(
        collections: &mut HashMap<String, Collection>,
        record: DocumentRecord,
    ) -> StoreResult<()> {
        let collection = collections
            .get_mut(&record.collection)
            .ok_or_else(|| StoreError::UnknownCollection(record.collection.clone()))?;

        let document: Value = serde_json::from_slice(&record.body)?;
        collection.check_insert(&document).map_err(|e| {
            IndexError::build_failed(
                e.index(),
                format!(
                    "replayed document {}:{} conflicts: {}",
                    record.collection,
                    record.document_id,
                    e.message()
                ),
            )
        })?;
        collection.apply_insert(document);
        Ok(())
    }

    fn read_state(&self) -> StoreResult<RwLockReadGuard<'_, StoreState>> {
        self.state
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }

    fn write_state(&self) -> StoreResult<RwLockWriteGuard<'_, StoreState>> {
        self.state
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }

    pub fn is_closed(&self) -> bool {
        self.read_state().map(|s| s.closed).unwrap_or(true)
    }

    /// Inserts one document.
    ///
    /// Assigns `_id`, `__v`, `createdAt` and `updatedAt`, overwriting any
    /// values supplied by the caller. Unique indexes are checked before the
    /// record is written, so a rejected insert leaves no trace.
    pub fn insert(&self, collection: &str, document: Value) -> StoreResult<Value> {
        let mut state = self.write_state()?;
        if state.closed {
            return Err(StoreError::Closed);
        }

        let Value::Object(mut fields) = document else {
            return Err(StoreError::NotAnObject);
        };

        let now = timestamp_now();
        fields.insert("_id".to_string(), Value::String(Uuid::new_v4().simple().to_string()));
        fields.insert("__v".to_string(), Value::from(0));
        fields.insert("createdAt".to_string(), Value::String(now.clone()));
        fields.insert("updatedAt".to_string(), Value::String(now));
        let document = Value::Object(fields);

        let StoreState {
            collections, writer, ..
        } = &mut *state;

        let target = collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;

        target
            .check_insert(&document)
            .map_err(|e| StoreError::DuplicateKey {
                collection: collection.to_string(),
                index: e.index().to_string(),
                key: e.key().to_string(),
            })?;

        if let Some(writer) = writer.as_mut() {
            if writer.is_failed() {
                return Err(StoreError::Unavailable(
                    "storage writer failed, restart required".to_string(),
                ));
            }
            let id = document["_id"].as_str().unwrap_or_default();
            let record = DocumentRecord::new(collection, id, serde_json::to_vec(&document)?);
            writer.append(&record)?;
        }

        target.apply_insert(document.clone());
        Ok(document)
    }

    /// Runs a query against one collection.
    pub fn find(&self, collection: &str, query: &Query) -> StoreResult<Vec<Value>> {
        let state = self.read_state()?;
        let target = state
            .collections
            .get(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;
        Ok(target.find(query))
    }

    /// First document (in insertion order) matching every predicate.
    pub fn find_one(&self, collection: &str, filter: &[Predicate]) -> StoreResult<Option<Value>> {
        let query = Query {
            filter: filter.to_vec(),
            limit: Some(1),
            ..Query::default()
        };
        Ok(self.find(collection, &query)?.into_iter().next())
    }

    pub fn find_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        let state = self.read_state()?;
        let target = state
            .collections
            .get(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;
        Ok(target.get(id).cloned())
    }

    /// Documents stored under a named index key.
    ///
    /// Returns an empty list when the index does not exist on the collection
    /// or the value count does not match its fields.
    pub fn find_by_index(
        &self,
        collection: &str,
        index: &str,
        values: &[&Value],
    ) -> StoreResult<Vec<Value>> {
        let state = self.read_state()?;
        let target = state
            .collections
            .get(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;
        Ok(target.find_by_index(index, values).unwrap_or_default())
    }

    pub fn count(&self, collection: &str, filter: &[Predicate]) -> StoreResult<usize> {
        let state = self.read_state()?;
        let target = state
            .collections
            .get(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))?;
        Ok(if filter.is_empty() {
            target.len()
        } else {
            target.count(filter)
        })
    }

    /// Stops accepting writes and records a clean shutdown.
    ///
    /// Calling it more than once is harmless.
    pub fn shutdown(&self) -> StoreResult<()> {
        let mut state = self.write_state()?;
        if state.closed {
            return Ok(());
        }
        state.closed = true;
        state.writer = None;

        if let Some(dir) = &self.data_dir {
            fs::write(dir.join(CLEAN_SHUTDOWN_MARKER), "")?;
        }

        log_event(Event::StoreClosed);
        Ok(())
    }
}
