//! Observability HTTP Routes
//!
//! `/health` never touches the store.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use serde_json::Value;

use crate::store::timestamp_now;

use super::response::Envelope;
use super::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub timestamp: String,
}

pub fn health_routes() -> Router {
    Router::new().route("/health", get(health_handler))
}

pub fn observability_routes(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok",
        message: "DAKIA Academy API is running",
        timestamp: timestamp_now(),
    };

    (StatusCode::OK, Json(response))
}

async fn metrics_handler(State(state): State<AppState>) -> Json<Envelope<Value>> {
    Json(Envelope::ok(state.metrics.to_json()))
}
