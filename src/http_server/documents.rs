//! Insert path shared by the create endpoints

use serde_json::Value;

use crate::observability::{log_event_with_fields, Event, Logger};
use crate::store::Projection;

use super::errors::{ApiError, ApiResult};
use super::state::AppState;

/// Inserts a validated document and returns it without internal fields.
///
/// A unique-index violation becomes a 400 carrying `duplicate`; any other
/// store failure is logged and reported as `failed`.
pub(crate) fn insert_document(
    state: &AppState,
    collection: &str,
    document: Value,
    failed: &'static str,
    duplicate: &'static str,
) -> ApiResult<Value> {
    match state.store.insert(collection, document) {
        Ok(stored) => {
            state.metrics.record_created(collection);
            let id = stored.get("_id").and_then(Value::as_str).unwrap_or_default();
            log_event_with_fields(
                Event::DocumentCreated,
                &[("collection", collection), ("id", id)],
            );
            Ok(Projection::exclude(&["__v"]).apply(stored))
        }
        Err(e) if e.is_duplicate_key() => {
            state.metrics.increment_duplicate_keys();
            Logger::warn(
                Event::DuplicateKeyRejected.as_str(),
                &[
                    ("collection", collection),
                    ("index", e.duplicate_index().unwrap_or_default()),
                ],
            );
            Err(ApiError::Conflict(duplicate))
        }
        Err(e) => Err(state.internal_error(failed, e)),
    }
}
