use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::auth;
use crate::dto::{AuthResponse, LoginDto, RegisterDto, UserSummary};
use crate::errors::ApiError;
use crate::models::User;
use crate::repo;
use crate::AppState;

/// Handler for registering a new account
///
/// This function handles POST requests to `/api/auth/register`.
///
/// A duplicate email is a Conflict; a malformed email or empty password is
/// a Validation error. On success the new identity is returned together
/// with a freshly issued bearer token, so registration doubles as login.
#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterDto>,
) -> Result<Json<AuthResponse>, ApiError> {
    info!("Registering new user");

    if !payload.email.contains('@') {
        return Err(ApiError::Validation("A valid email is required".to_string()));
    }
    if payload.password.is_empty() {
        return Err(ApiError::Validation("A password is required".to_string()));
    }

    let existing = repo::find_user_by_email(&state.pool, &payload.email)
        .map_err(ApiError::Database)?;
    if existing.is_some() {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    let password_hash = auth::hash_password(&payload.password).map_err(ApiError::Database)?;

    let user = repo::create_user(&state.pool, &payload.email, &password_hash)
        .map_err(ApiError::Database)?;

    let token = repo::issue_token(&state.pool, user.user_id, state.config.token_ttl())
        .map_err(ApiError::Database)?;

    info!("Successfully registered user with id: {}", user.user_id);

    Ok(Json(auth_response(user, token.token)))
}

/// Handler for logging in
///
/// This function handles POST requests to `/api/auth/login`.
///
/// Unknown email and wrong password answer with the same Unauthenticated
/// message. A successful login refreshes the user's last-login timestamp
/// and issues a fresh bearer token.
#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginDto>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Some(user) = repo::find_user_by_email(&state.pool, &payload.email)
        .map_err(ApiError::Database)?
    else {
        return Err(ApiError::Unauthenticated(
            "Incorrect email or password".to_string(),
        ));
    };

    if !auth::verify_password(&payload.password, &user.password_hash)
        .map_err(ApiError::Database)?
    {
        return Err(ApiError::Unauthenticated(
            "Incorrect email or password".to_string(),
        ));
    }

    repo::touch_last_login(&state.pool, user.user_id).map_err(ApiError::Database)?;

    let token = repo::issue_token(&state.pool, user.user_id, state.config.token_ttl())
        .map_err(ApiError::Database)?;

    info!("User {} logged in", user.user_id);

    Ok(Json(auth_response(user, token.token)))
}

fn auth_response(user: User, token: String) -> AuthResponse {
    let name = user.display_name().to_string();
    AuthResponse {
        success: true,
        user: UserSummary {
            id: user.user_id,
            email: user.email,
            name,
        },
        token,
    }
}
