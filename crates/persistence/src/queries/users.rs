// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User directory queries.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use slotbook_domain::{User, normalize_email};
use tracing::debug;

use crate::data_models::UserRow;
use crate::diesel_schema::users;
use crate::error::PersistenceError;

backend_fn! {
/// Retrieves a user by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the user is not found.
pub fn find_user(conn: &mut _, user_id: i64) -> Result<Option<User>, PersistenceError> {
    let row: Option<UserRow> = users::table
        .find(user_id)
        .select(UserRow::as_select())
        .first(conn)
        .optional()?;

    row.map(UserRow::into_domain).transpose()
}
}

backend_fn! {
/// Retrieves a user by e-mail address (case-insensitive).
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the user is not found.
pub fn find_user_by_email(conn: &mut _, email: &str) -> Result<Option<User>, PersistenceError> {
    let email: String = normalize_email(email);
    debug!("Looking up user by email: {}", email);

    let row: Option<UserRow> = users::table
        .filter(users::email.eq(&email))
        .select(UserRow::as_select())
        .first(conn)
        .optional()?;

    row.map(UserRow::into_domain).transpose()
}
}

backend_fn! {
/// Returns true if a user with this id exists.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn user_exists(conn: &mut _, user_id: i64) -> Result<bool, PersistenceError> {
    Ok(diesel::select(diesel::dsl::exists(users::table.find(user_id))).get_result(conn)?)
}
}
