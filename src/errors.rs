use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Not authorized")]
    Forbidden,
    #[error("{0}")]
    Unauthenticated(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            // The triggering error message is surfaced in the body. This is
            // a debug convenience inherited from the reference behavior, not
            // a hardened production posture.
            ApiError::Database(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ApiError::NotFound(entity) => (StatusCode::NOT_FOUND, format!("{} not found", entity)),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "Not authorized".to_string()),
            ApiError::Unauthenticated(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
