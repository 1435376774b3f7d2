use crate::db::DbPool;
use crate::models::{AuthToken, NewUser, User};
use crate::schema::{auth_tokens, users};
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Creates a new user with an already-hashed credential
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `email` - The account email; uniqueness is enforced by the schema
/// * `password_hash` - The Argon2 PHC string for the password
///
/// ### Returns
///
/// A Result containing the newly created User if successful
///
/// ### Errors
///
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - The database insert operation fails (including a duplicate email)
#[instrument(skip(pool, password_hash), fields(email = %email))]
pub fn create_user(pool: &DbPool, email: &str, password_hash: &str) -> Result<User> {
    debug!("Creating new user");

    let conn = &mut pool.get()?;

    let new_user = NewUser::new(email.to_string(), password_hash.to_string());

    let user = diesel::insert_into(users::table)
        .values(&new_user)
        .returning(User::as_returning())
        .get_result(conn)?;

    info!("Successfully created user with id: {}", user.user_id);

    Ok(user)
}

/// Looks a user up by email
#[instrument(skip(pool), fields(email = %email))]
pub fn find_user_by_email(pool: &DbPool, email: &str) -> Result<Option<User>> {
    let conn = &mut pool.get()?;

    let result = users::table
        .filter(users::email.eq(email))
        .select(User::as_select())
        .first(conn)
        .optional()?;

    Ok(result)
}

/// Records a successful login on the user row
#[instrument(skip(pool), fields(user_id = %user_id))]
pub fn touch_last_login(pool: &DbPool, user_id: i32) -> Result<()> {
    let conn = &mut pool.get()?;

    diesel::update(users::table.find(user_id))
        .set(users::last_login.eq(Some(Utc::now().naive_utc())))
        .execute(conn)?;

    Ok(())
}

/// Issues a fresh bearer token for a user
///
/// The token is an opaque UUID persisted with a fixed time-to-live; clients
/// present it on every authenticated request.
#[instrument(skip(pool), fields(user_id = %user_id))]
pub fn issue_token(pool: &DbPool, user_id: i32, ttl: Duration) -> Result<AuthToken> {
    debug!("Issuing bearer token");

    let conn = &mut pool.get()?;

    let token = AuthToken::issue(user_id, ttl);

    diesel::insert_into(auth_tokens::table)
        .values(&token)
        .execute(conn)?;

    Ok(token)
}

/// Resolves a presented bearer token to its user
///
/// Returns None for unknown tokens and for tokens past their expiry; the
/// caller translates that into an Unauthenticated response.
#[instrument(skip(pool, token))]
pub fn resolve_token(pool: &DbPool, token: &str, now: DateTime<Utc>) -> Result<Option<User>> {
    let conn = &mut pool.get()?;

    let result = auth_tokens::table
        .inner_join(users::table)
        .filter(auth_tokens::token.eq(token))
        .filter(auth_tokens::expires_at.gt(now.naive_utc()))
        .select(User::as_select())
        .first(conn)
        .optional()?;

    Ok(result)
}
