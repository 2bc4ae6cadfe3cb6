//! Shared helpers for the HTTP API tests

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use dakia::http_server::{HttpServer, HttpServerConfig};
use dakia::models::catalog;
use dakia::store::DocumentStore;
use serde_json::{json, Value};
use tower::ServiceExt;

pub struct TestApp {
    pub store: Arc<DocumentStore>,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_store(Arc::new(DocumentStore::in_memory(&catalog())))
    }

    pub fn with_store(store: Arc<DocumentStore>) -> Self {
        let server = HttpServer::new(HttpServerConfig::default(), Arc::clone(&store));
        Self {
            store,
            router: server.router(),
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.post_raw(uri, body.to_string()).await
    }

    pub async fn post_raw(&self, uri: &str, body: String) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }
}

pub fn course_body(slug: &str, category: &str) -> Value {
    json!({
        "title": format!("Course {}", slug),
        "slug": slug,
        "description": "Practical AI for the team",
        "category": category,
        "author": "DAKIA Team",
        "lessons": [
            {"id": "l2", "title": "Prompting", "order": 2},
            {"id": "l1", "title": "Intro", "order": 1}
        ]
    })
}

pub fn user_body(email: &str) -> Value {
    json!({
        "name": "Nguyen Van An",
        "email": email,
        "password": "correct horse battery staple",
        "department": "Sales"
    })
}
