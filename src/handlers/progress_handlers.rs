use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::auth::AuthUser;
use crate::dto::{ProgressSummary, ProgressUpdateDto, SuccessResponse};
use crate::errors::ApiError;
use crate::repo;
use crate::AppState;

/// Handler for the caller's mastery summary of a set
///
/// This function handles GET requests to `/api/progress/{set_id}`. The
/// counts are scoped to the calling user; an unknown set yields an empty
/// summary rather than an error.
#[instrument(skip(state), fields(user_id = %user.user_id, set_id = %set_id))]
pub async fn get_progress_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(set_id): Path<i32>,
) -> Result<Json<ProgressSummary>, ApiError> {
    debug!("Computing progress summary");

    let summary = repo::set_progress_summary(&state.pool, user.user_id, set_id)
        .map_err(ApiError::Database)?;

    Ok(Json(summary))
}

/// Handler for recording a study event on a card
///
/// This function handles POST requests to `/api/progress/card/{card_id}`.
/// The card must exist (NotFound otherwise) and belong to a set owned by
/// the caller (Forbidden otherwise). The first event creates the progress
/// row; later events increment the study count and overwrite the mastery
/// flag.
#[instrument(skip(state, payload), fields(user_id = %user.user_id, card_id = %card_id))]
pub async fn record_progress_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(card_id): Path<i32>,
    Json(payload): Json<ProgressUpdateDto>,
) -> Result<Json<SuccessResponse>, ApiError> {
    info!("Recording study event");

    let (_, owner_id) = repo::get_card_with_owner(&state.pool, card_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound("Card"))?;

    if owner_id != user.user_id {
        return Err(ApiError::Forbidden);
    }

    repo::record_study(&state.pool, user.user_id, card_id, payload.is_mastered)
        .map_err(ApiError::Database)?;

    Ok(Json(SuccessResponse::ok()))
}
