// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reservation queries.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use slotbook_domain::{Reservation, ReservationStatus, SlotKey};
use tracing::debug;

use crate::data_models::{ReservationRow, SlotColumns, count_to_u32};
use crate::diesel_schema::{reservations, slot_ledger};
use crate::error::PersistenceError;

backend_fn! {
/// Retrieves a reservation by id.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be rebuilt.
/// Returns `Ok(None)` if the reservation is not found.
pub fn find_reservation(
    conn: &mut _,
    reservation_id: i64,
) -> Result<Option<Reservation>, PersistenceError> {
    let row: Option<ReservationRow> = reservations::table
        .find(reservation_id)
        .select(ReservationRow::as_select())
        .first(conn)
        .optional()?;

    row.map(ReservationRow::into_domain).transpose()
}
}

backend_fn! {
/// Retrieves every reservation owned by a user, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be rebuilt.
pub fn find_reservations_by_user(
    conn: &mut _,
    user_id: i64,
) -> Result<Vec<Reservation>, PersistenceError> {
    let rows: Vec<ReservationRow> = reservations::table
        .filter(reservations::user_id.eq(user_id))
        .order((
            reservations::created_at.asc(),
            reservations::reservation_id.asc(),
        ))
        .select(ReservationRow::as_select())
        .load(conn)?;

    debug!(user_id, count = rows.len(), "Loaded reservations for user");

    rows.into_iter().map(ReservationRow::into_domain).collect()
}
}

backend_fn! {
/// Counts non-cancelled reservations for a slot key.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_active_by_key(conn: &mut _, key: &SlotKey) -> Result<u32, PersistenceError> {
    let columns: SlotColumns = SlotColumns::from_key(key);

    let count: i64 = reservations::table
        .filter(reservations::slot_date.eq(&columns.slot_date))
        .filter(reservations::start_time.eq(&columns.start_time))
        .filter(reservations::end_time.eq(&columns.end_time))
        .filter(reservations::status.ne(ReservationStatus::Cancelled.as_str()))
        .count()
        .get_result(conn)?;

    count_to_u32(count)
}
}

backend_fn! {
/// Reads the ledger counter for a slot key.
///
/// Returns `Ok(None)` if no reservation has ever been admitted for the key.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn ledger_reserved_count(
    conn: &mut _,
    key: &SlotKey,
) -> Result<Option<u32>, PersistenceError> {
    let columns: SlotColumns = SlotColumns::from_key(key);

    let count: Option<i64> = slot_ledger::table
        .filter(slot_ledger::slot_date.eq(&columns.slot_date))
        .filter(slot_ledger::start_time.eq(&columns.start_time))
        .filter(slot_ledger::end_time.eq(&columns.end_time))
        .select(slot_ledger::reserved_count)
        .first(conn)
        .optional()?;

    count.map(count_to_u32).transpose()
}
}
