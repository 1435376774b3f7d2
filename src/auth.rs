use anyhow::{anyhow, Result};
use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

use crate::errors::ApiError;
use crate::repo;
use crate::AppState;

/// Hashes a password into an Argon2 PHC string
///
/// The salt is generated per call, so equal passwords produce distinct
/// hashes.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

/// Verifies a password against a stored PHC string
///
/// A malformed stored hash is an error; a mismatching password is Ok(false).
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| anyhow!("Stored password hash is malformed: {}", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// The authenticated caller, resolved from the bearer token
///
/// Using this as a handler argument is what marks an endpoint as
/// authenticated: extraction fails with 401 when the Authorization header
/// is missing or malformed, the token is unknown, or the token has
/// expired. The token is resolved against the store on every request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i32,
    pub email: String,
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(unauthenticated)?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or_else(unauthenticated)?;

        let user = repo::resolve_token(&state.pool, token, Utc::now())
            .map_err(ApiError::Database)?
            .ok_or_else(|| {
                debug!("Presented token is unknown or expired");
                unauthenticated()
            })?;

        Ok(AuthUser {
            user_id: user.user_id,
            email: user.email,
        })
    }
}

fn unauthenticated() -> ApiError {
    ApiError::Unauthenticated("Invalid or missing authentication token".to_string())
}
