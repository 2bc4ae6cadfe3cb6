//! # HTTP Server Module
//!
//! axum API for DAKIA Academy.
//!
//! # Endpoints
//!
//! - `GET  /api/health` - Liveness, no store access
//! - `GET  /api/metrics` - Counter snapshot
//! - `GET|POST /api/courses`, `GET /api/courses/:slug`,
//!   `GET /api/courses/:slug/lessons/:lesson_id`
//! - `GET|POST /api/users`
//! - `POST /api/contents`
//! - `GET  /api/admin/stats`

pub mod admin_routes;
pub mod config;
pub mod content_routes;
pub mod course_routes;
mod documents;
pub mod errors;
pub mod observability_routes;
mod params;
pub mod response;
pub mod server;
pub mod state;
pub mod user_routes;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult};
pub use response::Envelope;
pub use server::{shutdown_signal, HttpServer};
pub use state::AppState;
