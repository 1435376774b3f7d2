use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;

/// A directed association between two cards
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Serialize)]
#[diesel(table_name = crate::schema::flashcard_links)]
#[diesel(primary_key(link_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FlashcardLink {
    pub link_id: i32,
    pub from_card_id: i32,
    pub to_card_id: i32,
    pub link_type: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::flashcard_links)]
pub struct NewFlashcardLink {
    pub from_card_id: i32,
    pub to_card_id: i32,
    pub link_type: Option<String>,
    pub created_at: NaiveDateTime,
}

impl NewFlashcardLink {
    pub fn new(from_card_id: i32, to_card_id: i32, link_type: Option<String>) -> Self {
        Self {
            from_card_id,
            to_card_id,
            link_type,
            created_at: Utc::now().naive_utc(),
        }
    }
}
