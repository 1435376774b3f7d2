use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;

/// A registered account
///
/// The password credential is stored as an Argon2 PHC string and is never
/// serialized into API responses.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Serialize)]
#[diesel(table_name = crate::schema::users)]
#[diesel(primary_key(user_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    pub user_id: i32,

    pub email: String,

    #[serde(skip_serializing)]
    pub password_hash: String,

    pub created_at: NaiveDateTime,

    /// Refreshed on every successful login
    pub last_login: Option<NaiveDateTime>,
}

impl User {
    /// Display name shown to the client: the local part of the email
    pub fn display_name(&self) -> &str {
        self.email.split('@').next().unwrap_or(&self.email)
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
    pub last_login: Option<NaiveDateTime>,
}

impl NewUser {
    pub fn new(email: String, password_hash: String) -> Self {
        Self {
            email,
            password_hash,
            created_at: Utc::now().naive_utc(),
            last_login: None,
        }
    }
}
