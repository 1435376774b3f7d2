use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;

/// Per-user, per-card mastery tracking
///
/// One row per (user, card) pair, created lazily on the first study event.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Serialize)]
#[diesel(table_name = crate::schema::progress)]
#[diesel(primary_key(progress_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Progress {
    pub progress_id: i32,
    pub user_id: i32,
    pub card_id: i32,
    pub is_mastered: bool,
    pub times_studied: i32,
    pub last_studied: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::progress)]
pub struct NewProgress {
    pub user_id: i32,
    pub card_id: i32,
    pub is_mastered: bool,
    pub times_studied: i32,
    pub last_studied: NaiveDateTime,
}

impl NewProgress {
    /// First study event for a card: the count starts at 1
    pub fn first_study(user_id: i32, card_id: i32, is_mastered: bool) -> Self {
        Self {
            user_id,
            card_id,
            is_mastered,
            times_studied: 1,
            last_studied: Utc::now().naive_utc(),
        }
    }
}
