// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::reservation::ReservationStatus;

/// Errors raised while constructing slots or transitioning reservations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Slot capacity is zero, negative, or does not fit the storage type.
    InvalidCapacity {
        /// The rejected capacity value.
        capacity: i64,
    },
    /// Start or end time is unparseable, or start does not precede end.
    InvalidTimeRange {
        /// The requested start time, as given.
        start_time: String,
        /// The requested end time, as given.
        end_time: String,
    },
    /// A reservation was requested without a time slot.
    InvalidTimeSlot,
    /// The owning user identifier is not a valid (positive) id.
    InvalidUser {
        /// The rejected user id.
        user_id: i64,
    },
    /// A calendar date could not be parsed.
    InvalidDate {
        /// The invalid date text.
        date_string: String,
    },
    /// A stored or requested status string is not a known status.
    InvalidReservationStatus(String),
    /// Confirmation requires the reservation to be pending.
    ReservationNotPending {
        /// The status the reservation was actually in.
        status: ReservationStatus,
    },
    /// The reservation has already been cancelled.
    ReservationAlreadyCancelled,
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCapacity { capacity } => {
                write!(f, "Invalid capacity: {capacity}. Must be greater than 0")
            }
            Self::InvalidTimeRange {
                start_time,
                end_time,
            } => {
                write!(
                    f,
                    "Invalid time range '{start_time}'-'{end_time}': start time must be before end time"
                )
            }
            Self::InvalidTimeSlot => write!(f, "Invalid time slot: a time slot is required"),
            Self::InvalidUser { user_id } => write!(f, "Invalid user: {user_id}"),
            Self::InvalidDate { date_string } => {
                write!(f, "Invalid date '{date_string}': expected YYYY-MM-DD")
            }
            Self::InvalidReservationStatus(status) => {
                write!(f, "Invalid reservation status: {status}")
            }
            Self::ReservationNotPending { status } => {
                write!(f, "Reservation is not pending (current status: {status})")
            }
            Self::ReservationAlreadyCancelled => write!(f, "Reservation is already cancelled"),
        }
    }
}

impl std::error::Error for DomainError {}
