// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Dates travel as `YYYY-MM-DD`, times of day as `HH:MM` and timestamps as
//! RFC 3339 strings.

use slotbook_domain::{Reservation, ReservationStatus, TimeSlot, User, format_date, format_time};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::ApiError;

/// API request to book one unit of a time slot.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateReservationRequest {
    /// The user making the booking.
    pub user_id: i64,
    /// The calendar date (`YYYY-MM-DD`).
    pub date: String,
    /// Start of the window (`HH:MM`).
    pub start_time: String,
    /// End of the window (`HH:MM`), strictly after the start.
    pub end_time: String,
    /// Maximum number of non-cancelled reservations for this window.
    pub capacity: i64,
}

/// API request to confirm or cancel a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TransitionReservationRequest {
    /// The caller. Must own the reservation.
    pub user_id: i64,
}

/// API request to register a user.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RegisterUserRequest {
    /// The e-mail address. Stored lowercased.
    pub email: String,
    /// The display name.
    pub name: String,
    /// The plain-text password. Only its hash is stored.
    pub password: String,
}

/// A reservation as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReservationResponse {
    pub reservation_id: i64,
    pub user_id: i64,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub capacity: u32,
    pub status: ReservationStatus,
    pub version: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl ReservationResponse {
    /// Builds the response for a persisted reservation.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Internal` if the reservation has no id or a
    /// timestamp cannot be formatted.
    pub fn from_reservation(reservation: &Reservation) -> Result<Self, ApiError> {
        let reservation_id: i64 = reservation.reservation_id().ok_or_else(|| ApiError::Internal {
            message: String::from("Reservation has not been persisted"),
        })?;
        let slot: &TimeSlot = reservation.time_slot();

        Ok(Self {
            reservation_id,
            user_id: reservation.user_id(),
            date: format_date(slot.date()),
            start_time: format_time(slot.start_time()),
            end_time: format_time(slot.end_time()),
            capacity: slot.capacity(),
            status: reservation.status(),
            version: reservation.version(),
            created_at: format_timestamp(reservation.created_at())?,
            updated_at: format_timestamp(reservation.updated_at())?,
        })
    }
}

/// API response listing a user's reservations.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListReservationsResponse {
    /// The user whose reservations are listed.
    pub user_id: i64,
    /// Reservations in creation order, any status.
    pub reservations: Vec<ReservationResponse>,
}

/// A registered user. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UserResponse {
    pub user_id: i64,
    pub email: String,
    pub name: String,
    pub created_at: String,
}

impl UserResponse {
    /// Builds the response for a user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Internal` if `created_at` cannot be formatted.
    pub fn from_user(user: &User) -> Result<Self, ApiError> {
        Ok(Self {
            user_id: user.user_id,
            email: user.email.clone(),
            name: user.name.clone(),
            created_at: format_timestamp(user.created_at)?,
        })
    }
}

fn format_timestamp(value: OffsetDateTime) -> Result<String, ApiError> {
    value.format(&Rfc3339).map_err(|e| ApiError::Internal {
        message: format!("Failed to format timestamp: {e}"),
    })
}
