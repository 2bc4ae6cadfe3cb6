//! Content HTTP Routes
//!
//! A content document must point at an existing course and at one of that
//! course's lesson ids.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde_json::Value;

use crate::models::{Course, NewContent, CONTENTS, COURSES};

use super::documents::insert_document;
use super::errors::{ApiError, ApiResult};
use super::response::Envelope;
use super::state::AppState;

const CREATE_FAILED: &str = "Failed to create content";

pub fn content_routes(state: AppState) -> Router {
    Router::new()
        .route("/contents", post(create_content))
        .with_state(state)
}

async fn create_content(
    State(state): State<AppState>,
    body: Result<Json<NewContent>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Envelope<Value>>)> {
    let Json(body) = body.map_err(|e| state.internal_error(CREATE_FAILED, e.body_text()))?;
    let content = body
        .validate()
        .map_err(|e| state.internal_error(CREATE_FAILED, e))?;

    let course_doc = state
        .store
        .find_by_id(COURSES, &content.course_id)
        .map_err(|e| state.internal_error(CREATE_FAILED, e))?
        .ok_or_else(|| {
            ApiError::BadRequest(format!("Course {} does not exist", content.course_id))
        })?;
    let course = Course::from_document(&course_doc)
        .map_err(|e| state.internal_error(CREATE_FAILED, e))?;
    if course.lesson(&content.lesson_id).is_none() {
        return Err(ApiError::BadRequest(format!(
            "Lesson {} is not part of course {}",
            content.lesson_id, course.slug
        )));
    }

    let document = content
        .to_document()
        .map_err(|e| state.internal_error(CREATE_FAILED, e))?;
    // The (courseId, lessonId) index is not unique, so a conflict cannot occur
    let created = insert_document(&state, CONTENTS, document, CREATE_FAILED, CREATE_FAILED)?;
    Ok((StatusCode::CREATED, Json(Envelope::ok(created))))
}
