use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::auth::AuthUser;
use crate::dto::{CreateSetDto, SetWithCardCount, SuccessResponse};
use crate::errors::ApiError;
use crate::models::FlashcardSet;
use crate::repo;
use crate::AppState;

/// Handler for listing the caller's flashcard sets
///
/// This function handles GET requests to `/api/sets`. Each set comes
/// annotated with a live count of its cards.
#[instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn list_sets_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Vec<SetWithCardCount>>, ApiError> {
    debug!("Listing sets");

    let sets = repo::list_sets_with_counts(&state.pool, user.user_id)
        .map_err(ApiError::Database)?;

    Ok(Json(sets))
}

/// Handler for creating a new flashcard set
///
/// This function handles POST requests to `/api/sets`.
#[instrument(skip(state, payload), fields(user_id = %user.user_id, title = %payload.title))]
pub async fn create_set_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<CreateSetDto>,
) -> Result<Json<FlashcardSet>, ApiError> {
    info!("Creating new set");

    if payload.title.trim().is_empty() {
        return Err(ApiError::Validation("A title is required".to_string()));
    }

    let set = repo::create_set(&state.pool, user.user_id, payload.title, payload.description)
        .map_err(ApiError::Database)?;

    Ok(Json(set))
}

/// Handler for deleting a flashcard set
///
/// This function handles DELETE requests to `/api/sets/{set_id}`. The
/// delete cascades to the set's cards and to every link touching them.
#[instrument(skip(state), fields(user_id = %user.user_id, set_id = %set_id))]
pub async fn delete_set_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(set_id): Path<i32>,
) -> Result<Json<SuccessResponse>, ApiError> {
    info!("Deleting set");

    let deleted = repo::delete_set(&state.pool, user.user_id, set_id)
        .map_err(ApiError::Database)?;

    if !deleted {
        return Err(ApiError::NotFound("Set"));
    }

    Ok(Json(SuccessResponse::ok()))
}
