//! Metrics registry
//!
//! Counters only, monotonic, reset on process start.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters shared by all request handlers
///
/// Relaxed ordering throughout; readers only need eventually exact totals.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    users_created: AtomicU64,
    courses_created: AtomicU64,
    contents_created: AtomicU64,
    duplicate_key_rejections: AtomicU64,
    queries_executed: AtomicU64,
    request_failures: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one created document in the named collection.
    ///
    /// Unknown collection names are ignored.
    pub fn record_created(&self, collection: &str) {
        let counter = match collection {
            "users" => &self.users_created,
            "courses" => &self.courses_created,
            "contents" => &self.contents_created,
            _ => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_duplicate_keys(&self) {
        self.duplicate_key_rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_queries_executed(&self) {
        self.queries_executed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_request_failures(&self) {
        self.request_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            users_created: self.users_created.load(Ordering::Relaxed),
            courses_created: self.courses_created.load(Ordering::Relaxed),
            contents_created: self.contents_created.load(Ordering::Relaxed),
            duplicate_key_rejections: self.duplicate_key_rejections.load(Ordering::Relaxed),
            queries_executed: self.queries_executed.load(Ordering::Relaxed),
            request_failures: self.request_failures.load(Ordering::Relaxed),
        }
    }

    /// Current counters as a JSON object
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self.snapshot()).unwrap_or_default()
    }
}

/// A point-in-time copy of every counter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub users_created: u64,
    pub courses_created: u64,
    pub contents_created: u64,
    pub duplicate_key_rejections: u64,
    pub queries_executed: u64,
    pub request_failures: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_new_registry_is_zero() {
        let snapshot = MetricsRegistry::new().snapshot();
        assert_eq!(snapshot.users_created, 0);
        assert_eq!(snapshot.request_failures, 0);
    }

    #[test]
    fn test_record_created_per_collection() {
        let registry = MetricsRegistry::new();
        registry.record_created("users");
        registry.record_created("courses");
        registry.record_created("courses");
        registry.record_created("orders");

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.users_created, 1);
        assert_eq!(snapshot.courses_created, 2);
        assert_eq!(snapshot.contents_created, 0);
    }

    #[test]
    fn test_to_json_uses_camel_case() {
        let registry = MetricsRegistry::new();
        registry.increment_duplicate_keys();
        registry.increment_queries_executed();

        let json = registry.to_json();
        assert_eq!(json["duplicateKeyRejections"], 1);
        assert_eq!(json["queriesExecuted"], 1);
    }

    #[test]
    fn test_thread_safety() {
        let registry = Arc::new(MetricsRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let reg = Arc::clone(&registry);
                thread::spawn(move || {
                    for _ in 0..100 {
                        reg.increment_request_failures();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(registry.snapshot().request_failures, 800);
    }
}
