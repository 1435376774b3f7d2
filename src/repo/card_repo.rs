use crate::db::DbPool;
use crate::dto::UpdateCardDto;
use crate::models::{Flashcard, NewFlashcard};
use crate::schema::{flashcard_links, flashcard_sets, flashcards, progress};
use anyhow::Result;
use chrono::Utc;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Lists the cards in a set
///
/// The caller is responsible for having verified set ownership first.
#[instrument(skip(pool), fields(set_id = %set_id))]
pub fn list_cards(pool: &DbPool, set_id: i32) -> Result<Vec<Flashcard>> {
    let conn = &mut pool.get()?;

    let results = flashcards::table
        .filter(flashcards::set_id.eq(set_id))
        .select(Flashcard::as_select())
        .load(conn)?;

    debug!("Fetched {} cards for set {}", results.len(), set_id);

    Ok(results)
}

/// Creates a new card in a set
#[instrument(skip(pool, card), fields(set_id = %card.set_id))]
pub fn create_card(pool: &DbPool, card: NewFlashcard) -> Result<Flashcard> {
    debug!("Creating new card");

    let conn = &mut pool.get()?;

    let card = diesel::insert_into(flashcards::table)
        .values(&card)
        .returning(Flashcard::as_returning())
        .get_result(conn)?;

    info!("Successfully created card with id: {}", card.card_id);

    Ok(card)
}

/// Retrieves a card by its ID
#[instrument(skip(pool), fields(card_id = %card_id))]
pub fn get_card(pool: &DbPool, card_id: i32) -> Result<Option<Flashcard>> {
    let conn = &mut pool.get()?;

    let result = flashcards::table
        .find(card_id)
        .select(Flashcard::as_select())
        .first(conn)
        .optional()?;

    Ok(result)
}

/// Retrieves a card together with the user id that transitively owns it
///
/// Ownership of a card is ownership of its set; this is the single query
/// the Forbidden/NotFound gating on card mutations is built from.
#[instrument(skip(pool), fields(card_id = %card_id))]
pub fn get_card_with_owner(pool: &DbPool, card_id: i32) -> Result<Option<(Flashcard, i32)>> {
    let conn = &mut pool.get()?;

    let result = flashcards::table
        .inner_join(flashcard_sets::table)
        .filter(flashcards::card_id.eq(card_id))
        .select((Flashcard::as_select(), flashcard_sets::user_id))
        .first::<(Flashcard, i32)>(conn)
        .optional()?;

    Ok(result)
}

/// Applies a partial update to a card
///
/// Only the fields present in the changeset are overwritten; absent fields
/// keep their stored values. `updated_at` is always refreshed.
///
/// ### Returns
///
/// The updated card, or None if the card vanished under a concurrent
/// delete (the caller reports NotFound, never a silent write).
#[instrument(skip(pool, changes), fields(card_id = %card_id))]
pub fn update_card(
    pool: &DbPool,
    card_id: i32,
    changes: &UpdateCardDto,
) -> Result<Option<Flashcard>> {
    debug!("Updating card");

    let conn = &mut pool.get()?;

    if !changes.is_empty() {
        let affected = diesel::update(flashcards::table.find(card_id))
            .set((changes, flashcards::updated_at.eq(Utc::now().naive_utc())))
            .execute(conn)?;

        if affected == 0 {
            debug!("Card disappeared before update");
            return Ok(None);
        }
    }

    let card = flashcards::table
        .find(card_id)
        .select(Flashcard::as_select())
        .first(conn)
        .optional()?;

    Ok(card)
}

/// Deletes a card, cascading to its links and progress rows
///
/// ### Returns
///
/// `true` if a card was deleted, `false` if it did not exist
#[instrument(skip(pool), fields(card_id = %card_id))]
pub fn delete_card(pool: &DbPool, card_id: i32) -> Result<bool> {
    debug!("Deleting card with cascade");

    let conn = &mut pool.get()?;

    conn.transaction::<bool, anyhow::Error, _>(|conn| {
        diesel::delete(
            flashcard_links::table.filter(
                flashcard_links::from_card_id
                    .eq(card_id)
                    .or(flashcard_links::to_card_id.eq(card_id)),
            ),
        )
        .execute(conn)?;

        diesel::delete(progress::table.filter(progress::card_id.eq(card_id))).execute(conn)?;

        let affected = diesel::delete(flashcards::table.find(card_id)).execute(conn)?;

        if affected > 0 {
            info!("Deleted card {}", card_id);
        }

        Ok(affected > 0)
    })
}
