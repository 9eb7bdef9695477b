// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::repository::StoreError;
use slotbook_domain::{DomainError, SlotKey};

/// Errors returned by booking operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    /// A slot or reservation rule was violated.
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// The requesting user is not registered.
    #[error("User {user_id} not found")]
    UserNotFound { user_id: i64 },
    /// No reservation has this id.
    #[error("Reservation {reservation_id} not found")]
    ReservationNotFound { reservation_id: i64 },
    /// The slot already holds as many reservations as it allows.
    #[error("Time slot {slot} is full ({reserved} of {capacity} reserved)")]
    CapacityExceeded {
        slot: SlotKey,
        reserved: u32,
        capacity: u32,
    },
    /// The caller does not own the reservation.
    #[error("User {caller_user_id} is not allowed to modify reservation {reservation_id}")]
    Unauthorized {
        reservation_id: i64,
        caller_user_id: i64,
    },
    /// Storage failed, or stayed contended past the retry budget.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Flat classification of [`BookingError`] for callers that map errors to
/// codes or status lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidCapacity,
    InvalidTimeRange,
    InvalidTimeSlot,
    InvalidUser,
    InvalidDate,
    InvalidReservationStatus,
    UserNotFound,
    ReservationNotFound,
    CapacityExceeded,
    ReservationNotPending,
    ReservationAlreadyCancelled,
    Unauthorized,
    Storage,
}

impl ErrorKind {
    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidCapacity => "invalid_capacity",
            Self::InvalidTimeRange => "invalid_time_range",
            Self::InvalidTimeSlot => "invalid_time_slot",
            Self::InvalidUser => "invalid_user",
            Self::InvalidDate => "invalid_date",
            Self::InvalidReservationStatus => "invalid_reservation_status",
            Self::UserNotFound => "user_not_found",
            Self::ReservationNotFound => "reservation_not_found",
            Self::CapacityExceeded => "capacity_exceeded",
            Self::ReservationNotPending => "reservation_not_pending",
            Self::ReservationAlreadyCancelled => "reservation_already_cancelled",
            Self::Unauthorized => "unauthorized",
            Self::Storage => "storage_unavailable",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl From<&DomainError> for ErrorKind {
    fn from(err: &DomainError) -> Self {
        match err {
            DomainError::InvalidCapacity { .. } => Self::InvalidCapacity,
            DomainError::InvalidTimeRange { .. } => Self::InvalidTimeRange,
            DomainError::InvalidTimeSlot => Self::InvalidTimeSlot,
            DomainError::InvalidUser { .. } => Self::InvalidUser,
            DomainError::InvalidDate { .. } => Self::InvalidDate,
            DomainError::InvalidReservationStatus(_) => Self::InvalidReservationStatus,
            DomainError::ReservationNotPending { .. } => Self::ReservationNotPending,
            DomainError::ReservationAlreadyCancelled => Self::ReservationAlreadyCancelled,
        }
    }
}

impl BookingError {
    /// Returns the flat kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => ErrorKind::from(err),
            Self::UserNotFound { .. } => ErrorKind::UserNotFound,
            Self::ReservationNotFound { .. } => ErrorKind::ReservationNotFound,
            Self::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }

    /// Returns true if the operation may succeed when repeated unchanged.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Storage(err) => err.is_retryable(),
            _ => false,
        }
    }
}
