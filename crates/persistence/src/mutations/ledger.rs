// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Slot capacity ledger.
//!
//! `slot_ledger` holds one row per slot key with the number of non-cancelled
//! reservations for that key. Admission claims a unit with a single
//! conditional increment:
//!
//! ```sql
//! UPDATE slot_ledger SET reserved_count = reserved_count + 1
//!  WHERE <key> AND reserved_count < <capacity>
//! ```
//!
//! One affected row means the unit is ours; zero means the slot is full. The
//! reservation row is inserted in the same transaction, so the counter and
//! the rows never disagree. Cancellation gives the unit back in
//! `mutations::reservations`.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use slotbook::Admission;
use slotbook_domain::Reservation;
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::data_models::{NewReservationRow, count_to_u32};
use crate::diesel_schema::{reservations, slot_ledger};
use crate::error::PersistenceError;

backend_fn! {
/// Admits a draft reservation if its slot has room.
///
/// Must run inside a transaction. The ledger row is locked before it is
/// read or updated (`BEGIN IMMEDIATE` on `SQLite`, an exclusive `InnoDB`
/// row lock on `MySQL`), so admissions on one key are serialized.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `draft` - The unpersisted reservation; its slot carries the capacity
///
/// # Errors
///
/// Returns an error if any statement fails. A full slot is
/// `Ok(Admission::Rejected { .. })`.
pub fn admit_reservation(conn: &mut _, draft: &Reservation) -> Result<Admission, PersistenceError> {
    let row: NewReservationRow = NewReservationRow::from_draft(draft)?;
    let capacity: i64 = row.capacity;

    // The ledger row may not exist yet for a first booking on this key.
    conn.lock_ledger_row(&row.slot_date, &row.start_time, &row.end_time)?;

    let claimed: usize = diesel::update(slot_ledger::table)
        .filter(slot_ledger::slot_date.eq(&row.slot_date))
        .filter(slot_ledger::start_time.eq(&row.start_time))
        .filter(slot_ledger::end_time.eq(&row.end_time))
        .filter(slot_ledger::reserved_count.lt(capacity))
        .set(slot_ledger::reserved_count.eq(slot_ledger::reserved_count + 1_i64))
        .execute(conn)?;

    if claimed == 0 {
        let reserved: i64 = slot_ledger::table
            .filter(slot_ledger::slot_date.eq(&row.slot_date))
            .filter(slot_ledger::start_time.eq(&row.start_time))
            .filter(slot_ledger::end_time.eq(&row.end_time))
            .select(slot_ledger::reserved_count)
            .first(conn)?;

        debug!(
            slot_date = %row.slot_date,
            start_time = %row.start_time,
            end_time = %row.end_time,
            reserved,
            capacity,
            "Slot full, admission rejected"
        );

        return Ok(Admission::Rejected {
            reserved: count_to_u32(reserved)?,
            capacity: count_to_u32(capacity)?,
        });
    }

    diesel::insert_into(reservations::table)
        .values(&row)
        .execute(conn)?;
    let reservation_id: i64 = conn.get_last_insert_rowid()?;

    debug!(reservation_id, "Slot unit claimed and reservation inserted");

    Ok(Admission::Admitted(row.into_stored(reservation_id)?))
}
}

backend_fn! {
/// Inserts a reservation and counts it in the ledger without checking
/// capacity.
///
/// Must run inside a transaction.
///
/// # Errors
///
/// Returns an error if any statement fails.
pub fn insert_reservation(
    conn: &mut _,
    draft: &Reservation,
) -> Result<Reservation, PersistenceError> {
    let row: NewReservationRow = NewReservationRow::from_draft(draft)?;

    // The ledger row may not exist yet for a first booking on this key.
    conn.lock_ledger_row(&row.slot_date, &row.start_time, &row.end_time)?;

    if draft.status().counts_toward_capacity() {
        diesel::update(slot_ledger::table)
            .filter(slot_ledger::slot_date.eq(&row.slot_date))
            .filter(slot_ledger::start_time.eq(&row.start_time))
            .filter(slot_ledger::end_time.eq(&row.end_time))
            .set(slot_ledger::reserved_count.eq(slot_ledger::reserved_count + 1_i64))
            .execute(conn)?;
    }

    diesel::insert_into(reservations::table)
        .values(&row)
        .execute(conn)?;
    let reservation_id: i64 = conn.get_last_insert_rowid()?;

    row.into_stored(reservation_id)
}
}
