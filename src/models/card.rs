use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;

/// A front/back study unit belonging to a set
///
/// Cards optionally carry a category, an explicit ordering, and a 2D
/// position used by the whiteboard study view.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Serialize)]
#[diesel(table_name = crate::schema::flashcards)]
#[diesel(primary_key(card_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Flashcard {
    pub card_id: i32,

    pub set_id: i32,

    pub front_text: String,

    pub back_text: String,

    /// Raw image bytes; populated out of band, never part of JSON responses
    #[serde(skip_serializing)]
    pub front_image: Option<Vec<u8>>,

    #[serde(skip_serializing)]
    pub back_image: Option<Vec<u8>>,

    pub category: Option<String>,

    pub order_number: Option<i32>,

    /// Horizontal coordinate in the whiteboard view
    pub position_x: Option<f64>,

    /// Vertical coordinate in the whiteboard view
    pub position_y: Option<f64>,

    pub created_at: NaiveDateTime,

    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::flashcards)]
pub struct NewFlashcard {
    pub set_id: i32,
    pub front_text: String,
    pub back_text: String,
    pub category: Option<String>,
    pub order_number: Option<i32>,
    pub position_x: Option<f64>,
    pub position_y: Option<f64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl NewFlashcard {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        set_id: i32,
        front_text: String,
        back_text: String,
        category: Option<String>,
        order_number: Option<i32>,
        position_x: Option<f64>,
        position_y: Option<f64>,
    ) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            set_id,
            front_text,
            back_text,
            category,
            order_number,
            position_x,
            position_y,
            created_at: now,
            updated_at: now,
        }
    }
}
