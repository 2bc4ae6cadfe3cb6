//! User, admin and health API tests

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{user_body, TestApp};
use dakia::auth::verify_password;
use dakia::models::{catalog, USERS};
use dakia::store::{DocumentStore, Predicate};
use serde_json::json;
use tempfile::TempDir;

// =============================================================================
// Users
// =============================================================================

#[tokio::test]
async fn test_create_user_hides_password() {
    let app = TestApp::new();

    let (status, body) = app.post("/api/users", user_body("An@DAKIA.vn")).await;

    assert_eq!(status, StatusCode::CREATED);
    let user = &body["data"];
    assert_eq!(user["email"], "an@dakia.vn");
    assert_eq!(user["role"], "user");
    assert!(user.get("password").is_none());
    assert!(user.get("__v").is_none());

    let stored = app
        .store
        .find_one(USERS, &[Predicate::eq("email", "an@dakia.vn")])
        .unwrap()
        .unwrap();
    let hash = stored["password"].as_str().unwrap();
    assert!(hash.starts_with("$argon2id$"));
    assert!(verify_password("correct horse battery staple", hash));
}

#[tokio::test]
async fn test_duplicate_email_is_bad_request() {
    let app = TestApp::new();
    app.post("/api/users", user_body("an@dakia.vn")).await;

    let (status, body) = app.post("/api/users", user_body(" AN@dakia.vn ")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"success": false, "error": "Email already exists"}));
    assert_eq!(app.store.count(USERS, &[]).unwrap(), 1);
}

#[tokio::test]
async fn test_missing_password_is_generic_failure() {
    let app = TestApp::new();
    let mut body = user_body("an@dakia.vn");
    body["password"] = json!("");

    let (status, body) = app.post("/api/users", body).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to create user");
    assert_eq!(app.store.count(USERS, &[]).unwrap(), 0);
}

#[tokio::test]
async fn test_list_users_filters_and_hides_passwords() {
    let app = TestApp::new();
    app.post("/api/users", user_body("an@dakia.vn")).await;
    let mut admin = user_body("lan@dakia.vn");
    admin["role"] = json!("admin");
    admin["department"] = json!("Marketing");
    app.post("/api/users", admin).await;

    let (status, body) = app.get("/api/users").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    for user in body["data"].as_array().unwrap() {
        assert!(user.get("password").is_none());
    }

    let (_, body) = app.get("/api/users?role=admin").await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["email"], "lan@dakia.vn");

    let (_, body) = app.get("/api/users?department=Sales&role=").await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["email"], "an@dakia.vn");

    let (status, body) = app.get("/api/users?role=admin&role=user").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["email"], "lan@dakia.vn");
}

// =============================================================================
// Persistence through the API
// =============================================================================

#[tokio::test]
async fn test_created_user_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    {
        let store = Arc::new(DocumentStore::open(temp_dir.path(), &catalog()).unwrap());
        let app = TestApp::with_store(Arc::clone(&store));
        let (status, _) = app.post("/api/users", user_body("an@dakia.vn")).await;
        assert_eq!(status, StatusCode::CREATED);
        store.shutdown().unwrap();
    }

    let store = Arc::new(DocumentStore::open(temp_dir.path(), &catalog()).unwrap());
    let app = TestApp::with_store(store);
    let (status, body) = app.post("/api/users", user_body("an@dakia.vn")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email already exists");
}

#[tokio::test]
async fn test_closed_store_is_generic_failure() {
    let app = TestApp::new();
    app.store.shutdown().unwrap();

    let (status, body) = app.post("/api/users", user_body("an@dakia.vn")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to create user");
}

// =============================================================================
// Admin stats, health and metrics
// =============================================================================

#[tokio::test]
async fn test_admin_stats() {
    let app = TestApp::new();
    let mut learner = user_body("an@dakia.vn");
    learner["enrolledCourses"] = json!([
        {"courseId": "c1", "progress": 40},
        {"courseId": "c2", "progress": 100, "completedAt": "2026-09-01T00:00:00Z"}
    ]);
    app.post("/api/users", learner).await;
    app.post("/api/users", user_body("lan@dakia.vn")).await;

    let (status, body) = app.get("/api/admin/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!({
            "totalUsers": 2,
            "totalCourses": 0,
            "activeEnrollments": 1,
            "completedEnrollments": 1
        })
    );
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["message"], "DAKIA Academy API is running");
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_health_ignores_closed_store() {
    let app = TestApp::new();
    app.store.shutdown().unwrap();

    let (status, body) = app.get("/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[tokio::test]
async fn test_metrics_count_creates_and_rejections() {
    let app = TestApp::new();
    app.post("/api/users", user_body("an@dakia.vn")).await;
    app.post("/api/users", user_body("an@dakia.vn")).await;

    let (status, body) = app.get("/api/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["usersCreated"], 1);
    assert_eq!(body["data"]["duplicateKeyRejections"], 1);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = TestApp::new();
    let (status, _) = app.get("/api/nothing-here").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
