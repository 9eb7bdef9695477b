// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Storage capabilities required by the booking service.
//!
//! Each trait is a narrow capability. Adapters (the Diesel persistence crate,
//! the in-memory [`MemoryStore`](crate::MemoryStore)) implement all of them,
//! and [`BookingStore`] names the combination.
//!
//! Methods take `&mut self` because a store handle owns exactly one
//! connection. Concurrency comes from running many handles, not from sharing
//! one.
//!
//! `UserDirectory` and `ReservationRepository` both name a `find_by_id`;
//! callers holding a full store use the qualified form.

use slotbook_domain::{Reservation, SlotKey, User};

/// Errors surfaced by storage adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Lock contention or a busy database. Safe to retry.
    Transient(String),
    /// An optimistic update lost a race; the stored version has moved on.
    VersionConflict {
        /// The reservation whose version check failed.
        reservation_id: i64,
    },
    /// A row the operation depends on does not exist.
    NotFound(String),
    /// Any other storage failure. Not retried.
    Backend(String),
}

impl StoreError {
    /// Returns true if repeating the operation may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_) | Self::VersionConflict { .. })
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transient(msg) => write!(f, "Storage temporarily unavailable: {msg}"),
            Self::VersionConflict { reservation_id } => write!(
                f,
                "Reservation {reservation_id} was modified concurrently"
            ),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::Backend(msg) => write!(f, "Storage error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Outcome of an admission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Capacity was available. Carries the persisted reservation.
    Admitted(Reservation),
    /// The slot was full at decision time.
    Rejected {
        /// Non-cancelled reservations holding the slot.
        reserved: u32,
        /// Capacity the request was checked against.
        capacity: u32,
    },
}

/// Read access to registered users.
pub trait UserDirectory {
    /// Returns true if a user with this id exists.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the lookup fails.
    fn exists(&mut self, user_id: i64) -> Result<bool, StoreError>;

    /// Looks up a user by id.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the lookup fails.
    fn find_by_id(&mut self, user_id: i64) -> Result<Option<User>, StoreError>;
}

/// Reservation storage.
pub trait ReservationRepository {
    /// Inserts a reservation without consulting capacity.
    ///
    /// The slot's reserved count is still updated so later admissions see it.
    /// The booking path never calls this; it goes through
    /// [`CapacityLedger::try_reserve`].
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the insert fails.
    fn create(&mut self, draft: &Reservation) -> Result<Reservation, StoreError>;

    /// Looks up a reservation by id.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the lookup fails.
    fn find_by_id(&mut self, reservation_id: i64) -> Result<Option<Reservation>, StoreError>;

    /// Returns every reservation owned by `user_id`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the lookup fails.
    fn find_by_user_id(&mut self, user_id: i64) -> Result<Vec<Reservation>, StoreError>;

    /// Persists a transitioned reservation.
    ///
    /// The write only applies if the stored version still equals
    /// `reservation.version()`. On success the stored version is one higher
    /// and the returned reservation reflects it. Moving a reservation out of a
    /// capacity-holding status releases its unit of capacity in the same
    /// write.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::VersionConflict` if the stored version differs and
    /// `StoreError::NotFound` if the reservation does not exist.
    fn update(&mut self, reservation: &Reservation) -> Result<Reservation, StoreError>;

    /// Counts non-cancelled reservations for a slot key.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the count fails.
    fn count_by_key(&mut self, key: &SlotKey) -> Result<u32, StoreError>;
}

/// Atomic admit-or-reject decision for new reservations.
///
/// Implementations must serialize the capacity check and the insert against
/// every other admission for the same [`SlotKey`]: under N concurrent attempts
/// on a slot with room for K, exactly K are admitted.
pub trait CapacityLedger {
    /// Admits `draft` if its slot has room, persisting it in the same step.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the decision could not be made. A full slot
    /// is not an error; it is `Admission::Rejected`.
    fn try_reserve(&mut self, draft: &Reservation) -> Result<Admission, StoreError>;
}

/// Everything the booking service needs from storage.
pub trait BookingStore: UserDirectory + ReservationRepository + CapacityLedger {}

impl<T: UserDirectory + ReservationRepository + CapacityLedger> BookingStore for T {}
