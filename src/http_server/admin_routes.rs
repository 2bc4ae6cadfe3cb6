//! Admin dashboard HTTP Routes

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use serde_json::Value;

use crate::models::{COURSES, USERS};
use crate::store::Query;

use super::errors::ApiResult;
use super::response::Envelope;
use super::state::AppState;

const STATS_FAILED: &str = "Failed to fetch stats";

/// Dashboard summary cards
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_users: usize,
    pub total_courses: usize,
    /// Enrollments without `completedAt`
    pub active_enrollments: usize,
    pub completed_enrollments: usize,
}

impl AdminStats {
    fn count_enrollments(&mut self, user: &Value) {
        let enrollments = user
            .get("enrolledCourses")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        for enrollment in enrollments {
            match enrollment.get("completedAt") {
                Some(v) if !v.is_null() => self.completed_enrollments += 1,
                _ => self.active_enrollments += 1,
            }
        }
    }
}

pub fn admin_routes(state: AppState) -> Router {
    Router::new()
        .route("/admin/stats", get(get_stats))
        .with_state(state)
}

async fn get_stats(State(state): State<AppState>) -> ApiResult<Json<Envelope<AdminStats>>> {
    let users = state
        .store
        .find(USERS, &Query::new())
        .map_err(|e| state.internal_error(STATS_FAILED, e))?;
    let total_courses = state
        .store
        .count(COURSES, &[])
        .map_err(|e| state.internal_error(STATS_FAILED, e))?;
    state.metrics.increment_queries_executed();

    let mut stats = AdminStats {
        total_users: users.len(),
        total_courses,
        ..AdminStats::default()
    };
    for user in &users {
        stats.count_enrollments(user);
    }

    Ok(Json(Envelope::ok(stats)))
}
