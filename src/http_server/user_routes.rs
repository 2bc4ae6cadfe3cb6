//! User HTTP Routes
//!
//! Passwords are hashed before anything is stored and never appear in a
//! response.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query as QueryParams, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;

use crate::models::{NewUser, USERS};
use crate::store::{timestamp_now, Predicate, Projection, Query, SortSpec};

use super::documents::insert_document;
use super::errors::ApiResult;
use super::params::{first_value, QueryPairs};
use super::response::Envelope;
use super::state::AppState;

const FETCH_FAILED: &str = "Failed to fetch users";
const CREATE_FAILED: &str = "Failed to create user";

#[derive(Debug, Default)]
pub struct UserListParams {
    pub role: Option<String>,
    pub department: Option<String>,
}

impl UserListParams {
    fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            role: first_value(pairs, "role"),
            department: first_value(pairs, "department"),
        }
    }

    fn filters(self) -> Vec<Predicate> {
        let mut filters = Vec::new();
        if let Some(role) = self.role.filter(|r| !r.is_empty()) {
            filters.push(Predicate::eq("role", role));
        }
        if let Some(department) = self.department.filter(|d| !d.is_empty()) {
            filters.push(Predicate::eq("department", department));
        }
        filters
    }
}

fn public_view() -> Projection {
    Projection::exclude(&["password", "__v"])
}

pub fn user_routes(state: AppState) -> Router {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .with_state(state)
}

async fn list_users(
    State(state): State<AppState>,
    params: Result<QueryParams<QueryPairs>, QueryRejection>,
) -> ApiResult<Json<Envelope<Vec<Value>>>> {
    let QueryParams(pairs) =
        params.map_err(|e| state.internal_error(FETCH_FAILED, e.body_text()))?;
    let query = Query {
        filter: UserListParams::from_pairs(&pairs).filters(),
        ..Query::default()
    }
    .sort(SortSpec::desc("createdAt"))
    .limit(state.list_limit)
    .project(public_view());

    let users = state
        .store
        .find(USERS, &query)
        .map_err(|e| state.internal_error(FETCH_FAILED, e))?;
    state.metrics.increment_queries_executed();

    Ok(Json(Envelope::list(users)))
}

async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<NewUser>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Envelope<Value>>)> {
    let Json(body) = body.map_err(|e| state.internal_error(CREATE_FAILED, e.body_text()))?;

    // Argon2 blocks for tens of milliseconds
    let hashed = tokio::task::spawn_blocking(move || body.hash_password())
        .await
        .map_err(|e| state.internal_error(CREATE_FAILED, e))?
        .map_err(|e| state.internal_error(CREATE_FAILED, e))?;

    let user = hashed
        .validate(&timestamp_now())
        .map_err(|e| state.internal_error(CREATE_FAILED, e))?;
    let document = user
        .to_document()
        .map_err(|e| state.internal_error(CREATE_FAILED, e))?;

    let created = insert_document(&state, USERS, document, CREATE_FAILED, "Email already exists")?;
    Ok((StatusCode::CREATED, Json(Envelope::ok(public_view().apply(created)))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters() {
        let params = UserListParams {
            role: Some("admin".into()),
            department: Some(String::new()),
        };
        assert_eq!(params.filters(), vec![Predicate::eq("role", "admin")]);
    }

    #[test]
    fn test_repeated_role_keeps_first() {
        let pairs = vec![
            ("role".to_string(), "admin".to_string()),
            ("role".to_string(), "user".to_string()),
        ];
        let params = UserListParams::from_pairs(&pairs);
        assert_eq!(params.role.as_deref(), Some("admin"));
        assert_eq!(params.department, None);
    }

    #[test]
    fn test_public_view_strips_secrets() {
        let doc = serde_json::json!({"name": "An", "password": "$argon2id$x", "__v": 0});
        assert_eq!(public_view().apply(doc), serde_json::json!({"name": "An"}));
    }
}
