// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Process-local store.
//!
//! `MemoryStore` implements every storage capability behind a single mutex.
//! Clones share state, so a clone per thread behaves like a connection per
//! thread against one database. It is for tests and single-process
//! development; nothing survives the process.

use crate::repository::{
    Admission, CapacityLedger, ReservationRepository, StoreError, UserDirectory,
};
use slotbook_domain::{Reservation, SlotKey, User, normalize_email};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use time::OffsetDateTime;

#[derive(Debug, Default)]
struct MemoryState {
    users: BTreeMap<i64, User>,
    reservations: BTreeMap<i64, Reservation>,
    next_user_id: i64,
    next_reservation_id: i64,
}

impl MemoryState {
    fn reserved_count(&self, key: &SlotKey) -> u32 {
        let count: usize = self
            .reservations
            .values()
            .filter(|r| r.time_slot().key() == *key && r.status().counts_toward_capacity())
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    fn insert(&mut self, draft: &Reservation) -> Reservation {
        self.next_reservation_id += 1;
        let reservation_id: i64 = self.next_reservation_id;

        let mut stored: Reservation = draft.clone();
        stored.record_persisted(reservation_id, draft.version(), draft.updated_at());
        self.reservations.insert(reservation_id, stored.clone());
        stored
    }
}

/// In-memory implementation of [`BookingStore`](crate::BookingStore).
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the e-mail is already registered.
    pub fn add_user(&self, email: &str, name: &str) -> Result<User, StoreError> {
        let mut state = self.lock()?;
        let email: String = normalize_email(email);

        if state.users.values().any(|u| u.email == email) {
            return Err(StoreError::Backend(format!(
                "User with email '{email}' already exists"
            )));
        }

        state.next_user_id += 1;
        let user: User = User {
            user_id: state.next_user_id,
            email,
            name: name.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        state.users.insert(user.user_id, user.clone());
        Ok(user)
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Backend(String::from("memory store lock poisoned")))
    }
}

impl UserDirectory for MemoryStore {
    fn exists(&mut self, user_id: i64) -> Result<bool, StoreError> {
        Ok(self.lock()?.users.contains_key(&user_id))
    }

    fn find_by_id(&mut self, user_id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.lock()?.users.get(&user_id).cloned())
    }
}

impl ReservationRepository for MemoryStore {
    fn create(&mut self, draft: &Reservation) -> Result<Reservation, StoreError> {
        Ok(self.lock()?.insert(draft))
    }

    fn find_by_id(&mut self, reservation_id: i64) -> Result<Option<Reservation>, StoreError> {
        Ok(self.lock()?.reservations.get(&reservation_id).cloned())
    }

    fn find_by_user_id(&mut self, user_id: i64) -> Result<Vec<Reservation>, StoreError> {
        // BTreeMap order is id order, which is insertion order.
        Ok(self
            .lock()?
            .reservations
            .values()
            .filter(|r| r.user_id() == user_id)
            .cloned()
            .collect())
    }

    fn update(&mut self, reservation: &Reservation) -> Result<Reservation, StoreError> {
        let reservation_id: i64 = reservation.reservation_id().ok_or_else(|| {
            StoreError::NotFound(String::from("reservation has not been persisted"))
        })?;

        let mut state = self.lock()?;
        let stored: &mut Reservation = state
            .reservations
            .get_mut(&reservation_id)
            .ok_or_else(|| StoreError::NotFound(format!("reservation {reservation_id}")))?;

        if stored.version() != reservation.version() {
            return Err(StoreError::VersionConflict { reservation_id });
        }

        let mut next: Reservation = reservation.clone();
        next.record_persisted(
            reservation_id,
            reservation.version() + 1,
            OffsetDateTime::now_utc(),
        );
        *stored = next.clone();
        Ok(next)
    }

    fn count_by_key(&mut self, key: &SlotKey) -> Result<u32, StoreError> {
        Ok(self.lock()?.reserved_count(key))
    }
}

impl CapacityLedger for MemoryStore {
    fn try_reserve(&mut self, draft: &Reservation) -> Result<Admission, StoreError> {
        let mut state = self.lock()?;
        let slot = draft.time_slot();
        let reserved: u32 = state.reserved_count(&slot.key());

        if !slot.is_available(reserved) {
            return Ok(Admission::Rejected {
                reserved,
                capacity: slot.capacity(),
            });
        }

        Ok(Admission::Admitted(state.insert(draft)))
    }
}
