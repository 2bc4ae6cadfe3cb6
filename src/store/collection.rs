//! A single named collection: documents in insertion order plus indexes.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use crate::index::{DocumentSeq, IndexError, IndexManager, IndexSpec};

use super::query::{matches_all, Predicate, Query, SortDirection};

/// Catalog entry: collection name and the indexes declared on it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSpec {
    pub name: String,
    pub indexes: Vec<IndexSpec>,
}

impl CollectionSpec {
    pub fn new(name: &str, indexes: Vec<IndexSpec>) -> Self {
        Self {
            name: name.to_string(),
            indexes,
        }
    }
}

pub(crate) struct Collection {
    documents: BTreeMap<DocumentSeq, Value>,
    ids: HashMap<String, DocumentSeq>,
    indexes: IndexManager,
    next_seq: DocumentSeq,
}

impl Collection {
    pub(crate) fn new(spec: &CollectionSpec) -> Self {
        Self {
            documents: BTreeMap::new(),
            ids: HashMap::new(),
            indexes: IndexManager::new(spec.indexes.clone()),
            next_seq: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.documents.len()
    }

    /// Rejects a document that collides on `_id` or on any unique index.
    pub(crate) fn check_insert(&self, document: &Value) -> Result<(), IndexError> {
        if let Some(id) = document.get("_id").and_then(Value::as_str) {
            if self.ids.contains_key(id) {
                return Err(IndexError::unique_violation("_id", format!("\"{}\"", id)));
            }
        }
        self.indexes.check_insert(document)
    }

    /// Stores an already-checked document and indexes it.
    pub(crate) fn apply_insert(&mut self, document: Value) -> DocumentSeq {
        let seq = self.next_seq;
        self.next_seq += 1;

        if let Some(id) = document.get("_id").and_then(Value::as_str) {
            self.ids.insert(id.to_string(), seq);
        }
        self.indexes.apply_insert(&document, seq);
        self.documents.insert(seq, document);
        seq
    }

    pub(crate) fn get(&self, id: &str) -> Option<&Value> {
        self.ids.get(id).and_then(|seq| self.documents.get(seq))
    }

    /// Candidate documents for a filter, in insertion order.
    ///
    /// Narrows through the first predicate that has a single-field index.
    fn candidates(&self, filter: &[Predicate]) -> Vec<(DocumentSeq, &Value)> {
        let indexed = filter
            .iter()
            .find_map(|p| self.indexes.lookup_field(&p.field, &p.value));

        match indexed {
            Some(seqs) => seqs
                .into_iter()
                .filter_map(|seq| self.documents.get(&seq).map(|doc| (seq, doc)))
                .collect(),
            None => self.documents.iter().map(|(seq, doc)| (*seq, doc)).collect(),
        }
    }

    pub(crate) fn find(&self, query: &Query) -> Vec<Value> {
        let mut hits: Vec<(DocumentSeq, &Value)> = self
            .candidates(&query.filter)
            .into_iter()
            .filter(|(_, doc)| matches_all(doc, &query.filter))
            .collect();

        if let Some(sort) = &query.sort {
            // Ties fall back to insertion order in the requested direction
            hits.sort_by(|(seq_a, a), (seq_b, b)| {
                sort.compare(a, b).then_with(|| match sort.direction {
                    SortDirection::Asc => seq_a.cmp(seq_b),
                    SortDirection::Desc => seq_b.cmp(seq_a),
                })
            });
        }

        let limit = query.limit.unwrap_or(usize::MAX);
        hits.into_iter()
            .take(limit)
            .map(|(_, doc)| query.projection.apply(doc.clone()))
            .collect()
    }

    pub(crate) fn count(&self, filter: &[Predicate]) -> usize {
        self.candidates(filter)
            .into_iter()
            .filter(|(_, doc)| matches_all(doc, filter))
            .count()
    }

    /// Documents stored under a named index key, in insertion order.
    pub(crate) fn find_by_index(&self, index: &str, values: &[&Value]) -> Option<Vec<Value>> {
        let seqs = self.indexes.lookup(index, values)?;
        Some(
            seqs.into_iter()
                .filter_map(|seq| self.documents.get(&seq).cloned())
                .collect(),
        )
    }
}
