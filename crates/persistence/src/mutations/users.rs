// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User registration.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use slotbook_domain::{User, normalize_email};
use time::OffsetDateTime;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::data_models::{format_timestamp, parse_timestamp};
use crate::diesel_schema::users;
use crate::error::PersistenceError;

backend_fn! {
/// Creates a new user.
///
/// The e-mail is normalized (trimmed, lowercased) for case-insensitive
/// uniqueness.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `email` - The e-mail address (will be normalized)
/// * `name` - The display name
/// * `password` - The plain-text password (will be hashed)
/// * `hash_cost` - The bcrypt cost factor
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the e-mail is taken.
pub fn create_user(
    conn: &mut _,
    email: &str,
    name: &str,
    password: &str,
    hash_cost: u32,
) -> Result<User, PersistenceError> {
    let email: String = normalize_email(email);

    let password_hash: String = bcrypt::hash(password, hash_cost)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;
    let created_at: String = format_timestamp(OffsetDateTime::now_utc())?;

    diesel::insert_into(users::table)
        .values((
            users::email.eq(&email),
            users::name.eq(name),
            users::password_hash.eq(&password_hash),
            users::created_at.eq(&created_at),
            users::updated_at.eq(&created_at),
        ))
        .execute(conn)?;

    let user_id: i64 = conn.get_last_insert_rowid()?;

    info!(user_id, email = %email, "User created");

    Ok(User {
        user_id,
        email,
        name: name.to_string(),
        created_at: parse_timestamp(&created_at)?,
    })
}
}
