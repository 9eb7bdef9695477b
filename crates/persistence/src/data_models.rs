// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and the text encodings used for stored columns.
//!
//! Dates are stored as `YYYY-MM-DD`, times as `HH:MM`, and timestamps as
//! fixed-width UTC RFC 3339 with microseconds, so text order is time order.

use diesel::prelude::*;
use slotbook_domain::{
    Reservation, ReservationStatus, SlotKey, TimeSlot, User, format_date, format_time,
    parse_date,
};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::diesel_schema::{reservations, users};
use crate::error::PersistenceError;

/// Formats a timestamp for storage.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be formatted.
pub fn format_timestamp(value: OffsetDateTime) -> Result<String, PersistenceError> {
    value
        .to_offset(UtcOffset::UTC)
        .format(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]Z"
        ))
        .map_err(|e| PersistenceError::Other(format!("Failed to format timestamp: {e}")))
}

/// Parses a stored RFC 3339 timestamp.
///
/// # Errors
///
/// Returns an error if the text is not RFC 3339.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339)
        .map_err(|e| PersistenceError::ReconstructionError(format!("timestamp '{value}': {e}")))
}

/// Column values identifying one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotColumns {
    pub slot_date: String,
    pub start_time: String,
    pub end_time: String,
}

impl SlotColumns {
    pub fn from_key(key: &SlotKey) -> Self {
        Self {
            slot_date: format_date(key.date()),
            start_time: format_time(key.start_time()),
            end_time: format_time(key.end_time()),
        }
    }
}

/// A `reservations` row.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = reservations)]
pub struct ReservationRow {
    pub reservation_id: i64,
    pub user_id: i64,
    pub slot_date: String,
    pub start_time: String,
    pub end_time: String,
    pub capacity: i64,
    pub status: String,
    pub version: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl ReservationRow {
    /// Rebuilds the domain reservation.
    ///
    /// # Errors
    ///
    /// Returns `ReconstructionError` if any column fails domain validation.
    pub fn into_domain(self) -> Result<Reservation, PersistenceError> {
        let invalid = |e: slotbook_domain::DomainError| {
            PersistenceError::ReconstructionError(format!(
                "reservation {}: {e}",
                self.reservation_id
            ))
        };

        let date = parse_date(&self.slot_date).map_err(invalid)?;
        let time_slot: TimeSlot =
            TimeSlot::parse(date, &self.start_time, &self.end_time, self.capacity)
                .map_err(invalid)?;
        let status: ReservationStatus = self.status.parse().map_err(invalid)?;

        Ok(Reservation::from_storage(
            self.reservation_id,
            self.user_id,
            time_slot,
            status,
            self.version,
            parse_timestamp(&self.created_at)?,
            parse_timestamp(&self.updated_at)?,
        ))
    }
}

/// Insert values for a new reservation row.
#[derive(Debug, Insertable)]
#[diesel(table_name = reservations)]
pub struct NewReservationRow {
    pub user_id: i64,
    pub slot_date: String,
    pub start_time: String,
    pub end_time: String,
    pub capacity: i64,
    pub status: String,
    pub version: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl NewReservationRow {
    /// Builds insert values from an unpersisted draft.
    ///
    /// # Errors
    ///
    /// Returns an error if a timestamp cannot be formatted.
    pub fn from_draft(draft: &Reservation) -> Result<Self, PersistenceError> {
        let slot: &TimeSlot = draft.time_slot();
        let columns: SlotColumns = SlotColumns::from_key(&slot.key());

        Ok(Self {
            user_id: draft.user_id(),
            slot_date: columns.slot_date,
            start_time: columns.start_time,
            end_time: columns.end_time,
            capacity: i64::from(slot.capacity()),
            status: draft.status().as_str().to_string(),
            version: draft.version(),
            created_at: format_timestamp(draft.created_at())?,
            updated_at: format_timestamp(draft.updated_at())?,
        })
    }

    /// Returns the reservation exactly as it now reads back from storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored values fail reconstruction.
    pub fn into_stored(self, reservation_id: i64) -> Result<Reservation, PersistenceError> {
        ReservationRow {
            reservation_id,
            user_id: self.user_id,
            slot_date: self.slot_date,
            start_time: self.start_time,
            end_time: self.end_time,
            capacity: self.capacity,
            status: self.status,
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_domain()
    }
}

/// The public columns of a `users` row. The password hash is never selected.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = users)]
pub struct UserRow {
    pub user_id: i64,
    pub email: String,
    pub name: String,
    pub created_at: String,
}

impl UserRow {
    /// Converts to the domain user.
    ///
    /// # Errors
    ///
    /// Returns an error if `created_at` is not a valid timestamp.
    pub fn into_domain(self) -> Result<User, PersistenceError> {
        Ok(User {
            user_id: self.user_id,
            email: self.email,
            name: self.name,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

/// Converts a stored count to `u32`.
///
/// # Errors
///
/// Returns `ReconstructionError` if the count is negative or too large.
pub fn count_to_u32(count: i64) -> Result<u32, PersistenceError> {
    use num_traits::ToPrimitive;

    count
        .to_u32()
        .ok_or_else(|| PersistenceError::ReconstructionError(format!("count out of range: {count}")))
}
