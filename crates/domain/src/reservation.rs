// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reservation lifecycle and transition logic.
//!
//! A reservation starts `pending` once capacity has been admitted for it.
//! The owner may confirm a pending reservation, and may cancel it from any
//! state other than `cancelled`. A cancelled reservation never transitions
//! again.
//!
//! Transitions here are in-memory only. Persisting them (and bumping the
//! stored version) is the caller's job.

use crate::error::DomainError;
use crate::time_slot::TimeSlot;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Reservation lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    /// Admitted against capacity, awaiting confirmation
    Pending,
    /// Confirmed by the owner
    Confirmed,
    /// Cancelled by the owner; no longer holds capacity
    Cancelled,
}

impl ReservationStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidReservationStatus(s.to_string())),
        }
    }

    /// Returns true if no further transition is possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns true if a reservation in this state occupies slot capacity.
    #[must_use]
    pub const fn counts_toward_capacity(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if moving from this status to `next` is permitted.
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed | Self::Cancelled) | (Self::Confirmed, Self::Cancelled)
        )
    }
}

impl FromStr for ReservationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's claim on one unit of a time slot's capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    reservation_id: Option<i64>,
    user_id: i64,
    time_slot: TimeSlot,
    status: ReservationStatus,
    version: i64,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl Reservation {
    /// Creates a new, not yet persisted, pending reservation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidUser` if `user_id <= 0` and
    /// `DomainError::InvalidTimeSlot` if no slot is given.
    pub fn new(user_id: i64, time_slot: Option<TimeSlot>) -> Result<Self, DomainError> {
        if user_id <= 0 {
            return Err(DomainError::InvalidUser { user_id });
        }
        let time_slot: TimeSlot = time_slot.ok_or(DomainError::InvalidTimeSlot)?;
        let now: OffsetDateTime = OffsetDateTime::now_utc();

        Ok(Self {
            reservation_id: None,
            user_id,
            time_slot,
            status: ReservationStatus::Pending,
            version: 1,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuilds a reservation from stored fields.
    ///
    /// No transition rules are checked; the stored row is trusted.
    #[must_use]
    pub const fn from_storage(
        reservation_id: i64,
        user_id: i64,
        time_slot: TimeSlot,
        status: ReservationStatus,
        version: i64,
        created_at: OffsetDateTime,
        updated_at: OffsetDateTime,
    ) -> Self {
        Self {
            reservation_id: Some(reservation_id),
            user_id,
            time_slot,
            status,
            version,
            created_at,
            updated_at,
        }
    }

    /// Confirms a pending reservation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ReservationNotPending` from any other state.
    pub fn confirm(&mut self) -> Result<(), DomainError> {
        if !self.status.can_transition_to(ReservationStatus::Confirmed) {
            return Err(DomainError::ReservationNotPending {
                status: self.status,
            });
        }
        self.status = ReservationStatus::Confirmed;
        self.updated_at = OffsetDateTime::now_utc();
        Ok(())
    }

    /// Cancels a pending or confirmed reservation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ReservationAlreadyCancelled` if already cancelled.
    pub fn cancel(&mut self) -> Result<(), DomainError> {
        if !self.status.can_transition_to(ReservationStatus::Cancelled) {
            return Err(DomainError::ReservationAlreadyCancelled);
        }
        self.status = ReservationStatus::Cancelled;
        self.updated_at = OffsetDateTime::now_utc();
        Ok(())
    }

    /// Records the identity and version assigned by storage after a write.
    pub const fn record_persisted(
        &mut self,
        reservation_id: i64,
        version: i64,
        updated_at: OffsetDateTime,
    ) {
        self.reservation_id = Some(reservation_id);
        self.version = version;
        self.updated_at = updated_at;
    }

    /// Returns true if `user_id` owns this reservation.
    #[must_use]
    pub const fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }

    /// Returns the storage id, or `None` before the reservation is persisted.
    #[must_use]
    pub const fn reservation_id(&self) -> Option<i64> {
        self.reservation_id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn user_id(&self) -> i64 {
        self.user_id
    }

    /// Returns the booked slot.
    #[must_use]
    pub const fn time_slot(&self) -> &TimeSlot {
        &self.time_slot
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> ReservationStatus {
        self.status
    }

    /// Returns the optimistic-lock version; 1 at creation.
    #[must_use]
    pub const fn version(&self) -> i64 {
        self.version
    }

    /// Returns the creation time.
    #[must_use]
    pub const fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    /// Returns the time of the last persisted change.
    #[must_use]
    pub const fn updated_at(&self) -> OffsetDateTime {
        self.updated_at
    }
}
