//! BTreeMap-backed index structures
//!
//! Each tree maps an index key to the insertion sequence numbers of the
//! documents carrying it. Sequence lists are kept sorted ascending so lookups
//! come back in insertion order.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

/// Insertion sequence number of a document within its collection
pub type DocumentSeq = u64;

/// Index key built from one or more JSON field values.
///
/// Ordering is deterministic: Bool < Int < Float < String < Composite.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IndexKey {
    Bool(bool),
    Int(i64),
    /// Float stored as order-preserving bits
    Float(u64),
    String(String),
    /// Multi-field key, one component per indexed field in declaration order
    Composite(Vec<IndexKey>),
}

impl IndexKey {
    pub fn from_float(v: f64) -> Self {
        let bits = v.to_bits();
        let ordered = if (bits >> 63) == 1 {
            !bits
        } else {
            bits ^ (1 << 63)
        };
        IndexKey::Float(ordered)
    }

    /// Key for a scalar JSON value. Null, arrays and objects are not indexable.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(IndexKey::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(IndexKey::Int(i))
                } else {
                    n.as_f64().map(IndexKey::from_float)
                }
            }
            Value::String(s) => Some(IndexKey::String(s.clone())),
            _ => None,
        }
    }

    /// Composite key from several values; `None` if any component is not indexable.
    pub fn composite<'a, I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let parts = values
            .into_iter()
            .map(IndexKey::from_json)
            .collect::<Option<Vec<_>>>()?;
        Some(IndexKey::Composite(parts))
    }
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKey::Bool(b) => write!(f, "{}", b),
            IndexKey::Int(i) => write!(f, "{}", i),
            IndexKey::Float(bits) => {
                let raw = if (bits >> 63) == 1 {
                    bits ^ (1 << 63)
                } else {
                    !bits
                };
                write!(f, "{}", f64::from_bits(raw))
            }
            IndexKey::String(s) => write!(f, "\"{}\"", s),
            IndexKey::Composite(parts) => {
                write!(f, "(")?;
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", part)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// One index: key -> sorted document sequence numbers.
#[derive(Debug, Default)]
pub struct IndexTree {
    tree: BTreeMap<IndexKey, Vec<DocumentSeq>>,
}

impl IndexTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a sequence number under a key, keeping the list sorted.
    pub fn insert(&mut self, key: IndexKey, seq: DocumentSeq) {
        let seqs = self.tree.entry(key).or_default();
        if let Err(pos) = seqs.binary_search(&seq) {
            seqs.insert(pos, seq);
        }
    }

    /// All sequence numbers for an exact key, ascending.
    pub fn lookup_eq(&self, key: &IndexKey) -> Vec<DocumentSeq> {
        self.tree.get(key).cloned().unwrap_or_default()
    }

    pub fn contains_key(&self, key: &IndexKey) -> bool {
        self.tree.contains_key(key)
    }

    /// Number of distinct keys
    pub fn key_count(&self) -> usize {
        self.tree.len()
    }
}
