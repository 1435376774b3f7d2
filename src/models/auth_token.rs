use chrono::{Duration, NaiveDateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// An issued bearer token
///
/// Tokens are opaque UUID strings looked up on every authenticated request;
/// a token past its `expires_at` no longer resolves to an identity.
#[derive(Queryable, Selectable, Insertable, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::auth_tokens)]
#[diesel(primary_key(token))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AuthToken {
    pub token: String,
    pub user_id: i32,
    pub created_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
}

impl AuthToken {
    pub fn issue(user_id: i32, ttl: Duration) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            token: Uuid::new_v4().to_string(),
            user_id,
            created_at: now,
            expires_at: now + ttl,
        }
    }
}
