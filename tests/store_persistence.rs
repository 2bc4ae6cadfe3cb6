//! Store Persistence Tests
//!
//! Documents and indexes survive a close and reopen. A rejected insert
//! leaves nothing behind on disk.

use dakia::models::{catalog, CONTENTS, CONTENT_LESSON_INDEX, COURSES, USERS};
use dakia::storage::{DocumentRecord, StorageWriter};
use dakia::store::{DocumentStore, Predicate, Query, SortSpec, StoreError, CLEAN_SHUTDOWN_MARKER};
use serde_json::json;
use std::fs::{self, OpenOptions};
use std::io::Write;
use tempfile::TempDir;

fn storage_len(temp_dir: &TempDir) -> u64 {
    fs::metadata(temp_dir.path().join("data").join("documents.dat"))
        .map(|m| m.len())
        .unwrap_or(0)
}

// =============================================================================
// Reopen
// =============================================================================

#[test]
fn test_documents_survive_reopen_in_order() {
    let temp_dir = TempDir::new().unwrap();
    {
        let store = DocumentStore::open(temp_dir.path(), &catalog()).unwrap();
        for slug in ["first", "second", "third"] {
            store
                .insert(COURSES, json!({"slug": slug, "category": "Sales"}))
                .unwrap();
        }
        store.shutdown().unwrap();
    }
    assert!(temp_dir.path().join(CLEAN_SHUTDOWN_MARKER).exists());

    let store = DocumentStore::open(temp_dir.path(), &catalog()).unwrap();
    assert!(!temp_dir.path().join(CLEAN_SHUTDOWN_MARKER).exists());

    let docs = store
        .find(COURSES, &Query::new().filter(Predicate::eq("category", "Sales")))
        .unwrap();
    let slugs: Vec<&str> = docs.iter().map(|d| d["slug"].as_str().unwrap()).collect();
    assert_eq!(slugs, vec!["first", "second", "third"]);
    assert!(docs.iter().all(|d| d["__v"] == 0));
}

#[test]
fn test_unique_index_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    {
        let store = DocumentStore::open(temp_dir.path(), &catalog()).unwrap();
        store.insert(COURSES, json!({"slug": "ai-basics"})).unwrap();
        store.shutdown().unwrap();
    }

    let store = DocumentStore::open(temp_dir.path(), &catalog()).unwrap();
    let err = store.insert(COURSES, json!({"slug": "ai-basics"})).unwrap_err();
    assert_eq!(err.duplicate_index(), Some("slug_unique"));
}

#[test]
fn test_unclean_shutdown_still_replays() {
    let temp_dir = TempDir::new().unwrap();
    {
        let store = DocumentStore::open(temp_dir.path(), &catalog()).unwrap();
        store.insert(USERS, json!({"email": "an@dakia.vn"})).unwrap();
        // dropped without shutdown()
    }
    assert!(!temp_dir.path().join(CLEAN_SHUTDOWN_MARKER).exists());

    let store = DocumentStore::open(temp_dir.path(), &catalog()).unwrap();
    assert_eq!(store.count(USERS, &[]).unwrap(), 1);
}

#[test]
fn test_compound_index_rebuilt_on_open() {
    let temp_dir = TempDir::new().unwrap();
    {
        let store = DocumentStore::open(temp_dir.path(), &catalog()).unwrap();
        store
            .insert(CONTENTS, json!({"courseId": "c1", "lessonId": "l1", "markdownContent": "# A"}))
            .unwrap();
        store
            .insert(CONTENTS, json!({"courseId": "c1", "lessonId": "l2", "markdownContent": "# B"}))
            .unwrap();
        store.shutdown().unwrap();
    }

    let store = DocumentStore::open(temp_dir.path(), &catalog()).unwrap();
    let hits = store
        .find_by_index(CONTENTS, CONTENT_LESSON_INDEX, &[&json!("c1"), &json!("l2")])
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["markdownContent"], "# B");
}

// =============================================================================
// Rejected writes
// =============================================================================

#[test]
fn test_rejected_insert_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let store = DocumentStore::open(temp_dir.path(), &catalog()).unwrap();
    store.insert(USERS, json!({"email": "an@dakia.vn"})).unwrap();
    let len = storage_len(&temp_dir);

    let err = store.insert(USERS, json!({"email": "an@dakia.vn"})).unwrap_err();
    assert!(err.is_duplicate_key());
    assert_eq!(storage_len(&temp_dir), len);
    assert_eq!(store.count(USERS, &[]).unwrap(), 1);
}

// =============================================================================
// Failed appends
// =============================================================================

#[test]
fn test_unacknowledged_record_does_not_block_retry() {
    let temp_dir = TempDir::new().unwrap();
    let store = DocumentStore::open(temp_dir.path(), &catalog()).unwrap();

    // A complete record whose fsync failed: on disk, never acknowledged
    {
        let mut stray = StorageWriter::open(temp_dir.path()).unwrap();
        stray
            .append(&DocumentRecord::new(
                USERS,
                "lost",
                br#"{"_id":"lost","email":"an@dakia.vn"}"#.to_vec(),
            ))
            .unwrap();
    }

    store.insert(USERS, json!({"email": "an@dakia.vn"})).unwrap();
    store.shutdown().unwrap();
    drop(store);

    let store = DocumentStore::open(temp_dir.path(), &catalog()).unwrap();
    assert_eq!(store.count(USERS, &[]).unwrap(), 1);
    assert!(store.find_by_id(USERS, "lost").unwrap().is_none());
}

#[test]
fn test_partial_write_does_not_corrupt_later_inserts() {
    let temp_dir = TempDir::new().unwrap();
    let store = DocumentStore::open(temp_dir.path(), &catalog()).unwrap();
    store.insert(USERS, json!({"email": "an@dakia.vn"})).unwrap();

    {
        let path = temp_dir.path().join("data").join("documents.dat");
        let mut file = OpenOptions::new().append(true).open(path).unwrap();
        file.write_all(&[0x40, 0, 0, 0, 0x7B]).unwrap();
    }

    store.insert(USERS, json!({"email": "lan@dakia.vn"})).unwrap();
    store.insert(USERS, json!({"email": "minh@dakia.vn"})).unwrap();
    store.shutdown().unwrap();
    drop(store);

    let store = DocumentStore::open(temp_dir.path(), &catalog()).unwrap();
    assert_eq!(store.count(USERS, &[]).unwrap(), 3);
    assert!(store
        .find_one(USERS, &[Predicate::eq("email", "minh@dakia.vn")])
        .unwrap()
        .is_some());
}

#[test]
fn test_writes_after_shutdown_fail() {
    let temp_dir = TempDir::new().unwrap();
    let store = DocumentStore::open(temp_dir.path(), &catalog()).unwrap();
    store.shutdown().unwrap();
    store.shutdown().unwrap();

    assert!(matches!(
        store.insert(USERS, json!({"email": "late@dakia.vn"})),
        Err(StoreError::Closed)
    ));
}

#[test]
fn test_descending_sort_with_limit() {
    let store = DocumentStore::in_memory(&catalog());
    for (slug, students) in [("old", 10), ("new", 30), ("mid", 20)] {
        store
            .insert(COURSES, json!({"slug": slug, "totalStudents": students}))
            .unwrap();
    }

    let docs = store
        .find(COURSES, &Query::new().sort(SortSpec::desc("totalStudents")).limit(2))
        .unwrap();
    let slugs: Vec<&str> = docs.iter().map(|d| d["slug"].as_str().unwrap()).collect();
    assert_eq!(slugs, vec!["new", "mid"]);
}
