use crate::db::DbPool;
use crate::models::{FlashcardLink, NewFlashcardLink};
use crate::schema::flashcard_links;
use anyhow::Result;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Lists the outgoing links of a card (links where the card is the source)
#[instrument(skip(pool), fields(card_id = %card_id))]
pub fn links_from_card(pool: &DbPool, card_id: i32) -> Result<Vec<FlashcardLink>> {
    let conn = &mut pool.get()?;

    let results = flashcard_links::table
        .filter(flashcard_links::from_card_id.eq(card_id))
        .select(FlashcardLink::as_select())
        .load(conn)?;

    debug!("Fetched {} outgoing links for card {}", results.len(), card_id);

    Ok(results)
}

/// Creates a directed link between two cards, idempotently
///
/// At most one link exists per ordered (from, to) pair: if one is already
/// present it is returned unchanged instead of creating a second row. The
/// check and insert share a transaction.
#[instrument(skip(pool), fields(from_card_id = %from_card_id, to_card_id = %to_card_id))]
pub fn create_link(
    pool: &DbPool,
    from_card_id: i32,
    to_card_id: i32,
    link_type: Option<String>,
) -> Result<FlashcardLink> {
    debug!("Creating link");

    let conn = &mut pool.get()?;

    conn.transaction::<FlashcardLink, anyhow::Error, _>(|conn| {
        let existing = flashcard_links::table
            .filter(flashcard_links::from_card_id.eq(from_card_id))
            .filter(flashcard_links::to_card_id.eq(to_card_id))
            .select(FlashcardLink::as_select())
            .first(conn)
            .optional()?;

        if let Some(link) = existing {
            debug!("Link already exists with id: {}", link.link_id);
            return Ok(link);
        }

        let new_link = NewFlashcardLink::new(from_card_id, to_card_id, link_type);

        let link = diesel::insert_into(flashcard_links::table)
            .values(&new_link)
            .returning(FlashcardLink::as_returning())
            .get_result(conn)?;

        info!("Successfully created link with id: {}", link.link_id);

        Ok(link)
    })
}

/// Retrieves a link by its ID
#[instrument(skip(pool), fields(link_id = %link_id))]
pub fn get_link(pool: &DbPool, link_id: i32) -> Result<Option<FlashcardLink>> {
    let conn = &mut pool.get()?;

    let result = flashcard_links::table
        .find(link_id)
        .select(FlashcardLink::as_select())
        .first(conn)
        .optional()?;

    Ok(result)
}

/// Deletes a link
///
/// ### Returns
///
/// `true` if a link was deleted, `false` if it did not exist
#[instrument(skip(pool), fields(link_id = %link_id))]
pub fn delete_link(pool: &DbPool, link_id: i32) -> Result<bool> {
    let conn = &mut pool.get()?;

    let affected = diesel::delete(flashcard_links::table.find(link_id)).execute(conn)?;

    Ok(affected > 0)
}

#[cfg(test)]
mod tests;
