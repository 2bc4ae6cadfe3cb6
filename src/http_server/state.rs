//! Shared handler state

use std::fmt::Display;
use std::sync::Arc;

use crate::observability::{Event, Logger, MetricsRegistry};
use crate::store::DocumentStore;

use super::errors::ApiError;

/// Cloned into every handler. The store handle is created by the caller
/// and outlives the router.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DocumentStore>,
    pub metrics: Arc<MetricsRegistry>,
    pub list_limit: usize,
}

impl AppState {
    pub fn new(store: Arc<DocumentStore>, list_limit: usize) -> Self {
        Self {
            store,
            metrics: Arc::new(MetricsRegistry::new()),
            list_limit,
        }
    }

    /// Logs the real cause and returns a generic 500 carrying only `public`.
    pub fn internal_error(&self, public: &'static str, cause: impl Display) -> ApiError {
        self.metrics.increment_request_failures();
        Logger::error(
            Event::RequestFailed.as_str(),
            &[("cause", &cause.to_string()), ("error", public)],
        );
        ApiError::Internal(public)
    }
}
