use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::auth::AuthUser;
use crate::dto::{CreateCardDto, SuccessResponse, UpdateCardDto};
use crate::errors::ApiError;
use crate::models::{Flashcard, NewFlashcard};
use crate::repo;
use crate::AppState;

/// Handler for listing the cards of a set
///
/// This function handles GET requests to `/api/sets/{set_id}/cards`. A set
/// that doesn't exist and a set owned by someone else are indistinguishable
/// to the caller: both are NotFound.
#[instrument(skip(state), fields(user_id = %user.user_id, set_id = %set_id))]
pub async fn list_cards_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(set_id): Path<i32>,
) -> Result<Json<Vec<Flashcard>>, ApiError> {
    debug!("Listing cards");

    repo::get_owned_set(&state.pool, user.user_id, set_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound("Set"))?;

    let cards = repo::list_cards(&state.pool, set_id).map_err(ApiError::Database)?;

    Ok(Json(cards))
}

/// Handler for creating a card in a set
///
/// This function handles POST requests to `/api/sets/{set_id}/cards`.
#[instrument(skip(state, payload), fields(user_id = %user.user_id, set_id = %set_id))]
pub async fn create_card_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(set_id): Path<i32>,
    Json(payload): Json<CreateCardDto>,
) -> Result<Json<Flashcard>, ApiError> {
    info!("Creating new card");

    let set = repo::get_owned_set(&state.pool, user.user_id, set_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound("Set"))?;

    let new_card = NewFlashcard::new(
        set.set_id,
        payload.front_text,
        payload.back_text,
        payload.category,
        payload.order_number,
        payload.position_x,
        payload.position_y,
    );

    let card = repo::create_card(&state.pool, new_card).map_err(ApiError::Database)?;

    info!("Successfully created card with id: {}", card.card_id);

    Ok(Json(card))
}

/// Handler for partially updating a card
///
/// This function handles PUT requests to `/api/cards/{card_id}`. A missing
/// card is NotFound; a card whose set belongs to someone else is Forbidden.
/// Fields absent from the payload are left untouched.
#[instrument(skip(state, payload), fields(user_id = %user.user_id, card_id = %card_id))]
pub async fn update_card_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(card_id): Path<i32>,
    Json(payload): Json<UpdateCardDto>,
) -> Result<Json<Flashcard>, ApiError> {
    info!("Updating card");

    let (_, owner_id) = repo::get_card_with_owner(&state.pool, card_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound("Card"))?;

    if owner_id != user.user_id {
        return Err(ApiError::Forbidden);
    }

    // A concurrent delete between the ownership check and the write
    // surfaces here as NotFound, never as a silent write.
    let card = repo::update_card(&state.pool, card_id, &payload)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound("Card"))?;

    Ok(Json(card))
}

/// Handler for deleting a card
///
/// This function handles DELETE requests to `/api/cards/{card_id}`, with
/// the same NotFound/Forbidden gating as update.
#[instrument(skip(state), fields(user_id = %user.user_id, card_id = %card_id))]
pub async fn delete_card_handler(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(card_id): Path<i32>,
) -> Result<Json<SuccessResponse>, ApiError> {
    info!("Deleting card");

    let (_, owner_id) = repo::get_card_with_owner(&state.pool, card_id)
        .map_err(ApiError::Database)?
        .ok_or(ApiError::NotFound("Card"))?;

    if owner_id != user.user_id {
        return Err(ApiError::Forbidden);
    }

    let deleted = repo::delete_card(&state.pool, card_id).map_err(ApiError::Database)?;

    if !deleted {
        return Err(ApiError::NotFound("Card"));
    }

    Ok(Json(SuccessResponse::ok()))
}
