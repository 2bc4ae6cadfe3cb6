//! Per-collection index manager
//!
//! # API
//!
//! - `check_insert(doc)` - Reject a document that would break a unique index
//! - `apply_insert(doc, seq)` - Record a stored document in every index
//! - `lookup_field(field, value)` - Equality lookup through a single-field index
//! - `lookup(index, values)` - Equality lookup through a named index
//!
//! Indexes are sparse: a document missing any indexed field (or holding a
//! null/array/object there) is simply not entered into that index.

use std::collections::HashMap;

use serde_json::Value;

use super::btree::{DocumentSeq, IndexKey, IndexTree};
use super::errors::{IndexError, IndexResult};

/// Declaration of one index over a collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSpec {
    pub name: String,
    pub fields: Vec<String>,
    pub unique: bool,
}

impl IndexSpec {
    /// Non-unique index on one field
    pub fn single(field: &str) -> Self {
        Self {
            name: format!("{}_1", field),
            fields: vec![field.to_string()],
            unique: false,
        }
    }

    /// Unique index on one field
    pub fn unique(field: &str) -> Self {
        Self {
            name: format!("{}_unique", field),
            fields: vec![field.to_string()],
            unique: true,
        }
    }

    /// Non-unique index over several fields, in order
    pub fn compound(fields: &[&str]) -> Self {
        Self {
            name: fields
                .iter()
                .map(|f| format!("{}_1", f))
                .collect::<Vec<_>>()
                .join("_"),
            fields: fields.iter().map(|f| f.to_string()).collect(),
            unique: false,
        }
    }

    /// Builds this index's key for a document, if the document is indexable.
    pub fn key_for(&self, document: &Value) -> Option<IndexKey> {
        match self.fields.as_slice() {
            [field] => document.get(field).and_then(IndexKey::from_json),
            fields => {
                let values = fields
                    .iter()
                    .map(|f| document.get(f))
                    .collect::<Option<Vec<_>>>()?;
                IndexKey::composite(values)
            }
        }
    }

    fn is_single_field(&self, field: &str) -> bool {
        self.fields.len() == 1 && self.fields[0] == field
    }
}

/// Maintains every declared index of one collection
#[derive(Debug)]
pub struct IndexManager {
    specs: Vec<IndexSpec>,
    trees: HashMap<String, IndexTree>,
}

impl IndexManager {
    pub fn new(specs: Vec<IndexSpec>) -> Self {
        let trees = specs
            .iter()
            .map(|spec| (spec.name.clone(), IndexTree::new()))
            .collect();
        Self { specs, trees }
    }

    /// Checks unique indexes without mutating anything.
    pub fn check_insert(&self, document: &Value) -> IndexResult<()> {
        for spec in self.specs.iter().filter(|s| s.unique) {
            let Some(key) = spec.key_for(document) else {
                continue;
            };
            let taken = self
                .trees
                .get(&spec.name)
                .map(|tree| tree.contains_key(&key))
                .unwrap_or(false);
            if taken {
                return Err(IndexError::unique_violation(&spec.name, key.to_string()));
            }
        }
        Ok(())
    }

    /// Enters a stored document into every index it qualifies for.
    ///
    /// Called after the document has been persisted and `check_insert` passed.
    pub fn apply_insert(&mut self, document: &Value, seq: DocumentSeq) {
        for spec in &self.specs {
            if let Some(key) = spec.key_for(document) {
                if let Some(tree) = self.trees.get_mut(&spec.name) {
                    tree.insert(key, seq);
                }
            }
        }
    }

    /// Equality lookup on a field covered by a single-field index.
    ///
    /// Returns `None` when no such index exists, so the caller must scan.
    pub fn lookup_field(&self, field: &str, value: &Value) -> Option<Vec<DocumentSeq>> {
        let spec = self.specs.iter().find(|s| s.is_single_field(field))?;
        let tree = self.trees.get(&spec.name)?;
        Some(match IndexKey::from_json(value) {
            Some(key) => tree.lookup_eq(&key),
            None => Vec::new(),
        })
    }

    /// Equality lookup through a named index, one value per indexed field.
    pub fn lookup(&self, index: &str, values: &[&Value]) -> Option<Vec<DocumentSeq>> {
        let spec = self.specs.iter().find(|s| s.name == index)?;
        if spec.fields.len() != values.len() {
            return None;
        }
        let tree = self.trees.get(&spec.name)?;
        let key = if values.len() == 1 {
            IndexKey::from_json(values[0])
        } else {
            IndexKey::composite(values.iter().copied())
        };
        Some(key.map(|k| tree.lookup_eq(&k)).unwrap_or_default())
    }
}
