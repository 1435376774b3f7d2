/// Common test utilities for Memora integration tests
///
/// This file contains shared functions for all integration tests: test
/// application setup against an in-memory SQLite database, request
/// helpers that speak JSON with an optional bearer token, and builders
/// for the entities most tests need (a registered user, a set, a card).

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use memora::{config, create_app, db::init_pool, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::Service;

/// Creates a test application backed by an in-memory SQLite database
///
/// Each call gets a unique shared in-memory database: plain ":memory:"
/// would give every pooled connection its own separate database, so the
/// migrations run on one connection wouldn't be visible on others.
pub fn create_test_app() -> Router {
    let unique_id = uuid::Uuid::new_v4();
    let database_url = format!("file:test_{}?mode=memory&cache=shared", unique_id);
    let pool = init_pool(&database_url);

    let conn = &mut pool.get().unwrap();
    memora::run_migrations(conn);

    create_app(Arc::new(AppState::new(pool, config::base_config(None))))
}

/// Sends a request with an optional JSON body and bearer token, returning
/// the response status and parsed JSON body
pub async fn send(
    app: &mut Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().uri(uri).method(method);

    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.call(request).await.unwrap();
    let status = response.status();

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

/// Registers a user via the API and returns (token, user_id)
pub async fn register(app: &mut Router, email: &str) -> (String, i64) {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "email": email, "password": "hunter2!" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    (
        body["token"].as_str().unwrap().to_string(),
        body["user"]["id"].as_i64().unwrap(),
    )
}

/// Creates a flashcard set via the API and returns its id
pub async fn create_set(app: &mut Router, token: &str, title: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/api/sets",
        Some(token),
        Some(json!({ "title": title })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    body["set_id"].as_i64().unwrap()
}

/// Creates a card via the API and returns its id
pub async fn create_card(app: &mut Router, token: &str, set_id: i64, front: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        &format!("/api/sets/{}/cards", set_id),
        Some(token),
        Some(json!({ "front_text": front, "back_text": "back" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    body["card_id"].as_i64().unwrap()
}

/// Records a metric through the public ingestion endpoint
pub async fn record_public_metric(app: &mut Router, metric_type: &str, data: Value) {
    let (status, body) = send(
        app,
        "POST",
        "/api/metrics/public",
        None,
        Some(json!({ "type": metric_type, "data": data })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}
