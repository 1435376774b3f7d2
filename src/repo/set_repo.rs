use crate::db::DbPool;
use crate::dto::SetWithCardCount;
use crate::models::{FlashcardSet, NewFlashcardSet};
use crate::schema::{flashcard_links, flashcard_sets, flashcards, progress};
use anyhow::Result;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Creates a new flashcard set for a user
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `user_id` - The owner of the new set
/// * `title` - The set title (required)
/// * `description` - An optional free-form description
///
/// ### Returns
///
/// A Result containing the newly created FlashcardSet if successful
#[instrument(skip(pool), fields(user_id = %user_id, title = %title))]
pub fn create_set(
    pool: &DbPool,
    user_id: i32,
    title: String,
    description: Option<String>,
) -> Result<FlashcardSet> {
    debug!("Creating new flashcard set");

    let conn = &mut pool.get()?;

    let new_set = NewFlashcardSet::new(user_id, title, description);

    let set = diesel::insert_into(flashcard_sets::table)
        .values(&new_set)
        .returning(FlashcardSet::as_returning())
        .get_result(conn)?;

    info!("Successfully created set with id: {}", set.set_id);

    Ok(set)
}

/// Lists every set owned by a user, each annotated with a live card count
///
/// The count is computed per set at read time rather than persisted, so it
/// always equals the number of card rows referencing the set.
#[instrument(skip(pool), fields(user_id = %user_id))]
pub fn list_sets_with_counts(pool: &DbPool, user_id: i32) -> Result<Vec<SetWithCardCount>> {
    debug!("Listing sets for user");

    let conn = &mut pool.get()?;

    let sets = flashcard_sets::table
        .filter(flashcard_sets::user_id.eq(user_id))
        .select(FlashcardSet::as_select())
        .load(conn)?;

    let mut result = Vec::with_capacity(sets.len());
    for set in sets {
        let card_count: i64 = flashcards::table
            .filter(flashcards::set_id.eq(set.set_id))
            .count()
            .get_result(conn)?;

        result.push(SetWithCardCount {
            set_id: set.set_id,
            title: set.title,
            description: set.description,
            created_at: set.created_at,
            card_count,
        });
    }

    info!("Retrieved {} sets", result.len());

    Ok(result)
}

/// Fetches a set only if it is owned by the given user
///
/// Ownership is resolved fresh on every request; there is no caching of
/// authorization decisions.
#[instrument(skip(pool), fields(user_id = %user_id, set_id = %set_id))]
pub fn get_owned_set(pool: &DbPool, user_id: i32, set_id: i32) -> Result<Option<FlashcardSet>> {
    let conn = &mut pool.get()?;

    let result = flashcard_sets::table
        .filter(flashcard_sets::set_id.eq(set_id))
        .filter(flashcard_sets::user_id.eq(user_id))
        .select(FlashcardSet::as_select())
        .first(conn)
        .optional()?;

    Ok(result)
}

/// Deletes a set owned by the user, cascading to its cards and to every
/// link and progress row touching those cards
///
/// The whole cascade runs in one transaction, so a failure leaves nothing
/// half-deleted.
///
/// ### Returns
///
/// `true` if a set was deleted, `false` if no such set is owned by the user
#[instrument(skip(pool), fields(user_id = %user_id, set_id = %set_id))]
pub fn delete_set(pool: &DbPool, user_id: i32, set_id: i32) -> Result<bool> {
    debug!("Deleting set with cascade");

    let conn = &mut pool.get()?;

    conn.transaction::<bool, anyhow::Error, _>(|conn| {
        let owned: i64 = flashcard_sets::table
            .filter(flashcard_sets::set_id.eq(set_id))
            .filter(flashcard_sets::user_id.eq(user_id))
            .count()
            .get_result(conn)?;

        if owned == 0 {
            debug!("Set not found or not owned by caller");
            return Ok(false);
        }

        let card_ids: Vec<i32> = flashcards::table
            .filter(flashcards::set_id.eq(set_id))
            .select(flashcards::card_id)
            .load(conn)?;

        let links_deleted = diesel::delete(
            flashcard_links::table.filter(
                flashcard_links::from_card_id
                    .eq_any(&card_ids)
                    .or(flashcard_links::to_card_id.eq_any(&card_ids)),
            ),
        )
        .execute(conn)?;

        diesel::delete(progress::table.filter(progress::card_id.eq_any(&card_ids)))
            .execute(conn)?;

        let cards_deleted =
            diesel::delete(flashcards::table.filter(flashcards::set_id.eq(set_id)))
                .execute(conn)?;

        diesel::delete(flashcard_sets::table.find(set_id)).execute(conn)?;

        info!(
            "Deleted set {} with {} cards and {} links",
            set_id, cards_deleted, links_deleted
        );

        Ok(true)
    })
}
