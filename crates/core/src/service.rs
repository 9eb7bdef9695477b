// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The booking service.
//!
//! `BookingService` is the only place that decides whether a reservation may
//! be created or transitioned. The capacity decision itself is delegated to
//! the store's [`CapacityLedger`](crate::CapacityLedger), which makes it
//! atomically; the service never counts reservations itself.

use crate::error::BookingError;
use crate::repository::{Admission, BookingStore, ReservationRepository, UserDirectory};
use crate::retry::RetryPolicy;
use slotbook_domain::{DomainError, Reservation, TimeSlot};
use tracing::{debug, info, warn};

/// Orchestrates reservation creation and lifecycle changes over one store
/// handle.
#[derive(Debug)]
pub struct BookingService<S: BookingStore> {
    store: S,
    retry: RetryPolicy,
}

impl<S: BookingStore> BookingService<S> {
    /// Creates a service with the default retry policy.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_retry_policy(store, RetryPolicy::default())
    }

    /// Creates a service that retries transient storage failures per `retry`.
    #[must_use]
    pub const fn with_retry_policy(store: S, retry: RetryPolicy) -> Self {
        Self { store, retry }
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Returns the underlying store mutably, for reads outside the service.
    pub const fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Books one unit of `time_slot` for `user_id`.
    ///
    /// The draft is validated before any storage access, so an invalid user id
    /// is reported as such even when no such user exists.
    ///
    /// # Errors
    ///
    /// - `Domain(InvalidUser)` / `Domain(InvalidTimeSlot)` for a bad draft
    /// - `UserNotFound` if the user is not registered
    /// - `CapacityExceeded` if the slot is full
    /// - `Storage` if storage fails or stays contended
    pub fn create_reservation(
        &mut self,
        user_id: i64,
        time_slot: Option<TimeSlot>,
    ) -> Result<Reservation, BookingError> {
        let draft: Reservation = Reservation::new(user_id, time_slot)?;
        let slot: TimeSlot = *draft.time_slot();
        let store: &mut S = &mut self.store;

        self.retry.run("create_reservation", || {
            if !store.exists(user_id)? {
                return Err(BookingError::UserNotFound { user_id });
            }

            match store.try_reserve(&draft)? {
                Admission::Admitted(reservation) => {
                    info!(
                        reservation_id = ?reservation.reservation_id(),
                        user_id,
                        slot = %slot.key(),
                        "Reservation admitted"
                    );
                    Ok(reservation)
                }
                Admission::Rejected { reserved, capacity } => {
                    warn!(
                        user_id,
                        slot = %slot.key(),
                        reserved,
                        capacity,
                        "Reservation rejected, slot is full"
                    );
                    Err(BookingError::CapacityExceeded {
                        slot: slot.key(),
                        reserved,
                        capacity,
                    })
                }
            }
        })
    }

    /// Loads a reservation by id.
    ///
    /// # Errors
    ///
    /// Returns `ReservationNotFound` if it does not exist, or `Storage`.
    pub fn get_reservation(&mut self, reservation_id: i64) -> Result<Reservation, BookingError> {
        let store: &mut S = &mut self.store;
        self.retry.run("get_reservation", || {
            load(store, reservation_id)
        })
    }

    /// Returns every reservation of `user_id` in creation order.
    ///
    /// An unknown user simply has no reservations.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the lookup fails.
    pub fn get_user_reservations(&mut self, user_id: i64) -> Result<Vec<Reservation>, BookingError> {
        let store: &mut S = &mut self.store;
        let mut reservations: Vec<Reservation> = self.retry.run("get_user_reservations", || {
            store.find_by_user_id(user_id).map_err(BookingError::from)
        })?;

        reservations.sort_by_key(|r| (r.created_at(), r.reservation_id()));
        debug!(user_id, count = reservations.len(), "Loaded user reservations");
        Ok(reservations)
    }

    /// Confirms a pending reservation on behalf of its owner.
    ///
    /// # Errors
    ///
    /// - `ReservationNotFound` if it does not exist
    /// - `Unauthorized` if `caller_user_id` is not the owner (whatever the status)
    /// - `Domain(ReservationNotPending)` if it is not pending
    /// - `Storage` if the write fails
    pub fn confirm_reservation(
        &mut self,
        reservation_id: i64,
        caller_user_id: i64,
    ) -> Result<Reservation, BookingError> {
        self.transition(
            "confirm_reservation",
            reservation_id,
            caller_user_id,
            Reservation::confirm,
        )
    }

    /// Cancels a pending or confirmed reservation on behalf of its owner,
    /// releasing its unit of capacity.
    ///
    /// # Errors
    ///
    /// - `ReservationNotFound` if it does not exist
    /// - `Unauthorized` if `caller_user_id` is not the owner (whatever the status)
    /// - `Domain(ReservationAlreadyCancelled)` if already cancelled
    /// - `Storage` if the write fails
    pub fn cancel_reservation(
        &mut self,
        reservation_id: i64,
        caller_user_id: i64,
    ) -> Result<Reservation, BookingError> {
        self.transition(
            "cancel_reservation",
            reservation_id,
            caller_user_id,
            Reservation::cancel,
        )
    }

    /// Loads, checks ownership, applies `apply`, then persists under the
    /// version guard. A lost race reloads and re-applies on the next attempt,
    /// so the loser sees the winner's state.
    fn transition(
        &mut self,
        operation: &str,
        reservation_id: i64,
        caller_user_id: i64,
        apply: fn(&mut Reservation) -> Result<(), DomainError>,
    ) -> Result<Reservation, BookingError> {
        let store: &mut S = &mut self.store;

        self.retry.run(operation, || {
            let mut reservation: Reservation = load(store, reservation_id)?;

            if !reservation.is_owned_by(caller_user_id) {
                warn!(
                    reservation_id,
                    caller_user_id,
                    owner_user_id = reservation.user_id(),
                    operation,
                    "Rejected transition by non-owner"
                );
                return Err(BookingError::Unauthorized {
                    reservation_id,
                    caller_user_id,
                });
            }

            let from = reservation.status();
            apply(&mut reservation)?;
            let stored: Reservation = store.update(&reservation)?;

            info!(
                reservation_id,
                from = %from,
                to = %stored.status(),
                version = stored.version(),
                "Reservation transitioned"
            );
            Ok(stored)
        })
    }
}

fn load<S: ReservationRepository>(
    store: &mut S,
    reservation_id: i64,
) -> Result<Reservation, BookingError> {
    ReservationRepository::find_by_id(store, reservation_id)?
        .ok_or(BookingError::ReservationNotFound { reservation_id })
}
