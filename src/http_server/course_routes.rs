//! Course HTTP Routes
//!
//! - `GET  /courses` - newest courses first, optional `category`, `level`, `published`
//! - `POST /courses` - create a course
//! - `GET  /courses/:slug` - one course by slug
//! - `GET  /courses/:slug/lessons/:lesson_id` - content of one lesson

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query as QueryParams, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;

use crate::models::{Course, NewCourse, CONTENTS, CONTENT_LESSON_INDEX, COURSES};
use crate::store::{Predicate, Projection, Query, SortSpec};

use super::documents::insert_document;
use super::errors::{ApiError, ApiResult};
use super::params::{first_value, QueryPairs};
use super::response::Envelope;
use super::state::AppState;

const FETCH_FAILED: &str = "Failed to fetch courses";
const CREATE_FAILED: &str = "Failed to create course";
const COURSE_FAILED: &str = "Failed to fetch course";
const COURSE_NOT_FOUND: &str = "Course not found";

#[derive(Debug, Default)]
pub struct CourseListParams {
    pub category: Option<String>,
    pub level: Option<String>,
    pub published: Option<String>,
}

impl CourseListParams {
    fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            category: first_value(pairs, "category"),
            level: first_value(pairs, "level"),
            published: first_value(pairs, "published"),
        }
    }

    /// Empty `category`/`level` are ignored. `published` filters whenever it
    /// is present, matching `true` only for the literal string "true".
    fn filters(self) -> Vec<Predicate> {
        let mut filters = Vec::new();
        if let Some(category) = self.category.filter(|c| !c.is_empty()) {
            filters.push(Predicate::eq("category", category));
        }
        if let Some(level) = self.level.filter(|l| !l.is_empty()) {
            filters.push(Predicate::eq("level", level));
        }
        if let Some(published) = self.published {
            filters.push(Predicate::eq("isPublished", published == "true"));
        }
        filters
    }
}

pub fn course_routes(state: AppState) -> Router {
    Router::new()
        .route("/courses", get(list_courses).post(create_course))
        .route("/courses/:slug", get(get_course))
        .route("/courses/:slug/lessons/:lesson_id", get(get_lesson_content))
        .with_state(state)
}

async fn list_courses(
    State(state): State<AppState>,
    params: Result<QueryParams<QueryPairs>, QueryRejection>,
) -> ApiResult<Json<Envelope<Vec<Value>>>> {
    let QueryParams(pairs) =
        params.map_err(|e| state.internal_error(FETCH_FAILED, e.body_text()))?;
    let query = Query {
        filter: CourseListParams::from_pairs(&pairs).filters(),
        ..Query::default()
    }
    .sort(SortSpec::desc("createdAt"))
    .limit(state.list_limit)
    .project(Projection::exclude(&["__v"]));

    let courses = state
        .store
        .find(COURSES, &query)
        .map_err(|e| state.internal_error(FETCH_FAILED, e))?;
    state.metrics.increment_queries_executed();

    Ok(Json(Envelope::list(courses)))
}

async fn create_course(
    State(state): State<AppState>,
    body: Result<Json<NewCourse>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Envelope<Value>>)> {
    let Json(body) = body.map_err(|e| state.internal_error(CREATE_FAILED, e.body_text()))?;
    let course = body
        .validate()
        .map_err(|e| state.internal_error(CREATE_FAILED, e))?;
    let document = course
        .to_document()
        .map_err(|e| state.internal_error(CREATE_FAILED, e))?;

    let created = insert_document(&state, COURSES, document, CREATE_FAILED, "Slug already exists")?;
    Ok((StatusCode::CREATED, Json(Envelope::ok(created))))
}

fn find_course_by_slug(state: &AppState, slug: &str) -> ApiResult<Value> {
    let filter = [Predicate::eq("slug", slug.trim().to_lowercase())];
    state
        .store
        .find_one(COURSES, &filter)
        .map_err(|e| state.internal_error(COURSE_FAILED, e))?
        .ok_or(ApiError::NotFound(COURSE_NOT_FOUND))
}

async fn get_course(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Envelope<Value>>> {
    let course = find_course_by_slug(&state, &slug)?;
    state.metrics.increment_queries_executed();
    Ok(Json(Envelope::ok(Projection::exclude(&["__v"]).apply(course))))
}

async fn get_lesson_content(
    State(state): State<AppState>,
    Path((slug, lesson_id)): Path<(String, String)>,
) -> ApiResult<Json<Envelope<Value>>> {
    let document = find_course_by_slug(&state, &slug)?;
    let course = Course::from_document(&document)
        .map_err(|e| state.internal_error(COURSE_FAILED, e))?;
    if course.lesson(&lesson_id).is_none() {
        return Err(ApiError::NotFound("Lesson not found"));
    }

    let course_id = document.get("_id").cloned().unwrap_or(Value::Null);
    let lesson_key = Value::String(lesson_id);
    let contents = state
        .store
        .find_by_index(CONTENTS, CONTENT_LESSON_INDEX, &[&course_id, &lesson_key])
        .map_err(|e| state.internal_error(COURSE_FAILED, e))?;
    state.metrics.increment_queries_executed();

    // Latest content for the lesson wins
    let content = contents
        .into_iter()
        .last()
        .ok_or(ApiError::NotFound("Content not found"))?;
    Ok(Json(Envelope::ok(Projection::exclude(&["__v"]).apply(content))))
}
