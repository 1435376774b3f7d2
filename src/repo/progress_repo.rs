use crate::db::DbPool;
use crate::dto::ProgressSummary;
use crate::models::{NewProgress, Progress};
use crate::schema::{flashcards, progress};
use anyhow::Result;
use chrono::Utc;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Records a study event for a (user, card) pair
///
/// The progress row is created lazily on the first study event with a
/// count of 1; every later event increments the count, refreshes the
/// last-studied timestamp, and overwrites the mastery flag with the
/// supplied value (it is not OR'd with prior state). Find-or-create runs
/// in a transaction.
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `user_id` - The studying user
/// * `card_id` - The card being studied
/// * `is_mastered` - The caller's current mastery verdict for the card
///
/// ### Returns
///
/// A Result containing the up-to-date Progress row if successful
#[instrument(skip(pool), fields(user_id = %user_id, card_id = %card_id, is_mastered = %is_mastered))]
pub fn record_study(
    pool: &DbPool,
    user_id: i32,
    card_id: i32,
    is_mastered: bool,
) -> Result<Progress> {
    debug!("Recording study event");

    let conn = &mut pool.get()?;

    conn.transaction::<Progress, anyhow::Error, _>(|conn| {
        let existing = progress::table
            .filter(progress::user_id.eq(user_id))
            .filter(progress::card_id.eq(card_id))
            .select(Progress::as_select())
            .first(conn)
            .optional()?;

        let row = match existing {
            None => {
                let new_progress = NewProgress::first_study(user_id, card_id, is_mastered);
                diesel::insert_into(progress::table)
                    .values(&new_progress)
                    .returning(Progress::as_returning())
                    .get_result(conn)?
            }
            Some(prior) => diesel::update(progress::table.find(prior.progress_id))
                .set((
                    progress::times_studied.eq(prior.times_studied + 1),
                    progress::is_mastered.eq(is_mastered),
                    progress::last_studied.eq(Utc::now().naive_utc()),
                ))
                .returning(Progress::as_returning())
                .get_result(conn)?,
        };

        info!(
            "Progress for card {} now at {} studies",
            card_id, row.times_studied
        );

        Ok(row)
    })
}

/// Computes the mastery summary of a set from one user's perspective
///
/// total is the live card count of the set; mastered counts the caller's
/// progress rows with the mastery flag raised; percentage uses integer
/// floor division and is defined as 0 for an empty set, never a division
/// error.
#[instrument(skip(pool), fields(user_id = %user_id, set_id = %set_id))]
pub fn set_progress_summary(pool: &DbPool, user_id: i32, set_id: i32) -> Result<ProgressSummary> {
    let conn = &mut pool.get()?;

    let total: i64 = flashcards::table
        .filter(flashcards::set_id.eq(set_id))
        .count()
        .get_result(conn)?;

    let card_ids = flashcards::table
        .filter(flashcards::set_id.eq(set_id))
        .select(flashcards::card_id);

    let mastered: i64 = progress::table
        .filter(progress::user_id.eq(user_id))
        .filter(progress::is_mastered.eq(true))
        .filter(progress::card_id.eq_any(card_ids))
        .count()
        .get_result(conn)?;

    // Floor semantics are load-bearing: 2 of 3 mastered is 66, not 67.
    let percentage = if total > 0 {
        (mastered * 100 / total) as i32
    } else {
        0
    };

    debug!(
        "Progress for set {}: {}/{} ({}%)",
        set_id, mastered, total, percentage
    );

    Ok(ProgressSummary {
        mastered,
        total,
        percentage,
    })
}

#[cfg(test)]
mod tests;
