// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reservation status transitions.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use slotbook_domain::{Reservation, ReservationStatus};
use tracing::debug;

use crate::data_models::{ReservationRow, format_timestamp, parse_timestamp};
use crate::diesel_schema::{reservations, slot_ledger};
use crate::error::PersistenceError;

backend_fn! {
/// Writes a transitioned reservation under an optimistic version guard.
///
/// The row is only updated if its stored version equals
/// `reservation.version()`; the stored version is then incremented. Leaving a
/// capacity-holding status returns one unit to the slot ledger.
///
/// Must run inside a transaction.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the reservation does not exist and
/// `PersistenceError::VersionConflict` if the stored version has moved on.
pub fn update_reservation(
    conn: &mut _,
    reservation: &Reservation,
) -> Result<Reservation, PersistenceError> {
    let reservation_id: i64 = reservation.reservation_id().ok_or_else(|| {
        PersistenceError::NotFound(String::from("reservation has not been persisted"))
    })?;

    let current: ReservationRow = reservations::table
        .find(reservation_id)
        .select(ReservationRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("reservation {reservation_id}")))?;

    let expected_version: i64 = reservation.version();
    if current.version != expected_version {
        return Err(PersistenceError::VersionConflict { reservation_id });
    }

    let previous: ReservationStatus = current
        .status
        .parse()
        .map_err(|e| PersistenceError::ReconstructionError(format!("{e}")))?;
    let next: ReservationStatus = reservation.status();
    let updated_at: String = format_timestamp(reservation.updated_at())?;
    let next_version: i64 = expected_version + 1;

    let written: usize = diesel::update(reservations::table)
        .filter(reservations::reservation_id.eq(reservation_id))
        .filter(reservations::version.eq(expected_version))
        .set((
            reservations::status.eq(next.as_str()),
            reservations::version.eq(next_version),
            reservations::updated_at.eq(&updated_at),
        ))
        .execute(conn)?;

    if written == 0 {
        return Err(PersistenceError::VersionConflict { reservation_id });
    }

    if previous.counts_toward_capacity() && !next.counts_toward_capacity() {
        diesel::update(slot_ledger::table)
            .filter(slot_ledger::slot_date.eq(&current.slot_date))
            .filter(slot_ledger::start_time.eq(&current.start_time))
            .filter(slot_ledger::end_time.eq(&current.end_time))
            .filter(slot_ledger::reserved_count.gt(0_i64))
            .set(slot_ledger::reserved_count.eq(slot_ledger::reserved_count - 1_i64))
            .execute(conn)?;

        debug!(reservation_id, "Released slot unit");
    }

    let mut stored: Reservation = reservation.clone();
    stored.record_persisted(reservation_id, next_version, parse_timestamp(&updated_at)?);
    Ok(stored)
}
}
