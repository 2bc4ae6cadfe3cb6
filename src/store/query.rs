//! Query description and evaluation
//!
//! Equality predicates only, no type coercion. A missing or null field never
//! matches. Sorting is stable and compares values by type rank first
//! (null < bool < number < string < array < object), then naturally.

use std::cmp::Ordering;

use serde_json::Value;

/// `field == value`
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub field: String,
    pub value: Value,
}

impl Predicate {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Checks the predicate against one document.
    pub fn matches(&self, document: &Value) -> bool {
        match document.get(&self.field) {
            None | Some(Value::Null) => false,
            Some(actual) => actual == &self.value,
        }
    }
}

/// True when the document satisfies every predicate (AND semantics).
pub fn matches_all(document: &Value, predicates: &[Predicate]) -> bool {
    predicates.iter().all(|p| p.matches(document))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Compares two documents on the sort field, honouring direction.
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        let ordering = compare_values(a.get(&self.field), b.get(&self.field));
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Total order over optional JSON values used for sorting.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => {
            let by_rank = rank(a).cmp(&rank(b));
            if by_rank != Ordering::Equal {
                return by_rank;
            }
            match (a, b) {
                (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
                (Value::Number(x), Value::Number(y)) => {
                    let x = x.as_f64().unwrap_or(0.0);
                    let y = y.as_f64().unwrap_or(0.0);
                    x.partial_cmp(&y).unwrap_or(Ordering::Equal)
                }
                (Value::String(x), Value::String(y)) => x.cmp(y),
                _ => Ordering::Equal,
            }
        }
    }
}

/// Fields removed from documents before they leave the store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    excluded: Vec<String>,
}

impl Projection {
    pub fn exclude(fields: &[&str]) -> Self {
        Self {
            excluded: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    pub fn apply(&self, mut document: Value) -> Value {
        if let Some(obj) = document.as_object_mut() {
            for field in &self.excluded {
                obj.remove(field);
            }
        }
        document
    }
}

/// find() arguments
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub filter: Vec<Predicate>,
    pub sort: Option<SortSpec>,
    pub limit: Option<usize>,
    pub projection: Projection,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filter.push(predicate);
        self
    }

    pub fn sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn project(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }
}
