// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Storage trait implementations for [`Persistence`].
//!
//! These are thin: each forwards to the matching adapter method and converts
//! `PersistenceError` into the core `StoreError`, so contention becomes
//! `StoreError::Transient` and is retried by the service.

use slotbook::{Admission, CapacityLedger, ReservationRepository, StoreError, UserDirectory};
use slotbook_domain::{Reservation, SlotKey, User};

use crate::Persistence;

impl UserDirectory for Persistence {
    fn exists(&mut self, user_id: i64) -> Result<bool, StoreError> {
        Ok(self.user_exists(user_id)?)
    }

    fn find_by_id(&mut self, user_id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.get_user(user_id)?)
    }
}

impl ReservationRepository for Persistence {
    fn create(&mut self, draft: &Reservation) -> Result<Reservation, StoreError> {
        Ok(self.insert_reservation(draft)?)
    }

    fn find_by_id(&mut self, reservation_id: i64) -> Result<Option<Reservation>, StoreError> {
        Ok(self.get_reservation(reservation_id)?)
    }

    fn find_by_user_id(&mut self, user_id: i64) -> Result<Vec<Reservation>, StoreError> {
        Ok(self.list_reservations_for_user(user_id)?)
    }

    fn update(&mut self, reservation: &Reservation) -> Result<Reservation, StoreError> {
        Ok(self.update_reservation(reservation)?)
    }

    fn count_by_key(&mut self, key: &SlotKey) -> Result<u32, StoreError> {
        Ok(self.count_active_reservations(key)?)
    }
}

impl CapacityLedger for Persistence {
    fn try_reserve(&mut self, draft: &Reservation) -> Result<Admission, StoreError> {
        Ok(self.admit_reservation(draft)?)
    }
}
