/// Memora: a flashcard study backend
///
/// This library provides the core functionality for a flashcard study
/// service: user accounts, flashcard sets and cards (with an optional
/// spatial layout for the whiteboard view), directed links between cards,
/// per-card mastery progress, and a usage-metrics subsystem whose
/// dashboard figures are aggregated on demand from an immutable event log.
///
/// ### Modules
///
/// - `db`: Database connection management
/// - `models`: Data structures backing the database tables
/// - `repo`: Repository layer for database operations, including the
///   metrics aggregator
/// - `schema`: Database schema definitions
/// - `auth`: Password hashing and bearer-token authentication
/// - `handlers`: Web API handlers
/// - `dto`: Request and response shapes
/// - `errors`: The API error taxonomy
/// - `config`: Layered startup configuration

/// Database connection module
pub mod db;

/// Data models module
pub mod models;

/// Repository module for database operations
pub mod repo;

/// Database schema module
pub mod schema;

/// Authentication module
pub mod auth;

/// Web API handlers
pub mod handlers;

/// Request/response data transfer objects
pub mod dto;

/// API error taxonomy
pub mod errors;

/// Application configuration
pub mod config;

use axum::{
    routing::{delete, get, post, put},
    Json, Router,
};
use std::sync::Arc;

/// Shared state for all handlers: the connection pool and the startup
/// configuration (the token lifetime lives there)
pub struct AppState {
    pub pool: db::DbPool,
    pub config: config::Config,
}

impl AppState {
    pub fn new(pool: db::DbPool, config: config::Config) -> Self {
        Self { pool, config }
    }
}

/// Handler for the root route, used as a liveness probe
async fn root_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Memora API is running" }))
}

/// Creates the application router with all routes
///
/// ### Arguments
///
/// * `state` - The shared application state (pool + config)
///
/// ### Returns
///
/// An Axum Router configured with all routes and the state attached
pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        // Identity: register and login both answer with a bearer token
        .route("/api/auth/register", post(handlers::register_handler))
        .route("/api/auth/login", post(handlers::login_handler))
        // Flashcard sets
        .route(
            "/api/sets",
            get(handlers::list_sets_handler).post(handlers::create_set_handler),
        )
        .route("/api/sets/{set_id}", delete(handlers::delete_set_handler))
        // Cards, scoped to their owning set
        .route(
            "/api/sets/{set_id}/cards",
            get(handlers::list_cards_handler).post(handlers::create_card_handler),
        )
        .route(
            "/api/cards/{card_id}",
            put(handlers::update_card_handler).delete(handlers::delete_card_handler),
        )
        // Links between cards
        .route(
            "/api/cards/{card_id}/links",
            get(handlers::get_card_links_handler).post(handlers::create_link_handler),
        )
        .route("/api/links/{link_id}", delete(handlers::delete_link_handler))
        // Mastery progress
        .route("/api/progress/{set_id}", get(handlers::get_progress_handler))
        .route(
            "/api/progress/card/{card_id}",
            post(handlers::record_progress_handler),
        )
        // Metrics ingestion and aggregation. Static segments win over the
        // {metric_type} capture, so the dashboard/uptime/activity routes
        // stay reachable.
        .route("/api/metrics", post(handlers::record_metric_handler))
        .route(
            "/api/metrics/public",
            post(handlers::record_metric_public_handler),
        )
        .route("/api/metrics/dashboard", get(handlers::dashboard_handler))
        .route("/api/metrics/uptime/status", get(handlers::uptime_handler))
        .route(
            "/api/metrics/user/activity",
            get(handlers::user_activity_handler),
        )
        .route(
            "/api/metrics/{metric_type}",
            get(handlers::metrics_by_type_handler),
        )
        .with_state(state)
}

/// Runs the embedded migrations
///
/// This function applies all database migrations to set up the schema.
///
/// ### Arguments
///
/// * `conn` - A mutable reference to a SQLite connection
///
/// ### Panics
///
/// This function will panic if the migrations fail to run
pub fn run_migrations(conn: &mut diesel::SqliteConnection) {
    use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

    // Define the embedded migrations
    const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

    // Run all pending migrations
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run migrations");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_state() -> Arc<AppState> {
        // The pool handle itself is cheap to clone; the Arc is only how the
        // repo test helper hands it out.
        let pool = repo::tests::setup_test_db();
        Arc::new(AppState::new((*pool).clone(), config::base_config(None)))
    }

    #[tokio::test]
    async fn test_root_handler() {
        let app = create_app(test_state());

        let request = Request::builder()
            .uri("/")
            .method("GET")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "Memora API is running");
    }

    #[tokio::test]
    async fn test_protected_route_without_token() {
        let app = create_app(test_state());

        let request = Request::builder()
            .uri("/api/sets")
            .method("GET")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_protected_route_with_unknown_token() {
        let app = create_app(test_state());

        let request = Request::builder()
            .uri("/api/sets")
            .method("GET")
            .header("Authorization", "Bearer not-a-real-token")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_public_dashboard_route_needs_no_token() {
        let app = create_app(test_state());

        let request = Request::builder()
            .uri("/api/metrics/dashboard")
            .method("GET")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
