use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::auth::AuthUser;
use crate::dto::{CreateLinkDto, SuccessResponse};
use crate::errors::ApiError;
use crate::models::FlashcardLink;
use crate::repo;
use crate::AppState;

/// Resolves a card and checks that its set belongs to the caller
///
/// Shared gating for every link operation: a missing card is NotFound, a
/// card owned through someone else's set is Forbidden.
fn authorize_card(state: &AppState, user: &AuthUser, card_id: i32) -> Result<(), ApiError> {
    let (_, owner_id) = repo::get_card_with_owner(&state.pool, card_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound("Card"))?;

    if owner_id != user.user_id {
        return Err(ApiError::Forbidden);
    }

    Ok(())
}

/// Handler for listing a card's outgoing links
///
/// This function handles GET requests to `/api/cards/{card_id}/links`.
/// Only links where the card is the source are returned.
#[instrument(skip(state), fields(user_id = %user.user_id, card_id = %card_id))]
pub async fn get_card_links_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(card_id): Path<i32>,
) -> Result<Json<Vec<FlashcardLink>>, ApiError> {
    debug!("Listing outgoing links");

    authorize_card(&state, &user, card_id)?;

    let links = repo::links_from_card(&state.pool, card_id).map_err(ApiError::Database)?;

    Ok(Json(links))
}

/// Handler for creating a link between two cards
///
/// This function handles POST requests to `/api/cards/{card_id}/links`.
/// Both endpoints must exist and both must belong to sets owned by the
/// caller. Creating a link that already exists returns the existing link
/// unchanged rather than an error.
#[instrument(skip(state, payload), fields(user_id = %user.user_id, from_card_id = %from_card_id))]
pub async fn create_link_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(from_card_id): Path<i32>,
    Json(payload): Json<CreateLinkDto>,
) -> Result<Json<FlashcardLink>, ApiError> {
    info!("Creating link");

    let to_card_id = payload
        .to_card_id
        .ok_or_else(|| ApiError::Validation("to_card_id is required".to_string()))?;

    authorize_card(&state, &user, from_card_id)?;
    authorize_card(&state, &user, to_card_id)?;

    let link = repo::create_link(&state.pool, from_card_id, to_card_id, payload.link_type)
        .map_err(ApiError::Database)?;

    Ok(Json(link))
}

/// Handler for deleting a link
///
/// This function handles DELETE requests to `/api/links/{link_id}`.
/// Authorization is resolved through the link's source card.
#[instrument(skip(state), fields(user_id = %user.user_id, link_id = %link_id))]
pub async fn delete_link_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(link_id): Path<i32>,
) -> Result<Json<SuccessResponse>, ApiError> {
    info!("Deleting link");

    let link = repo::get_link(&state.pool, link_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound("Link"))?;

    authorize_card(&state, &user, link.from_card_id)?;

    let deleted = repo::delete_link(&state.pool, link_id).map_err(ApiError::Database)?;

    if !deleted {
        return Err(ApiError::NotFound("Link"));
    }

    Ok(Json(SuccessResponse::ok()))
}
