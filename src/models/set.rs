use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;

/// A named collection of flashcards owned by exactly one user
///
/// Deleting a set cascades to its cards and, transitively, to any links
/// touching those cards.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Serialize)]
#[diesel(table_name = crate::schema::flashcard_sets)]
#[diesel(primary_key(set_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FlashcardSet {
    pub set_id: i32,
    pub user_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::flashcard_sets)]
pub struct NewFlashcardSet {
    pub user_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl NewFlashcardSet {
    pub fn new(user_id: i32, title: String, description: Option<String>) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            user_id,
            title,
            description,
            created_at: now,
            updated_at: now,
        }
    }
}
