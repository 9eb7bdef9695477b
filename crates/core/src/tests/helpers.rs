// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    Admission, BookingService, CapacityLedger, MemoryStore, ReservationRepository, RetryPolicy,
    StoreError, UserDirectory,
};
use slotbook_domain::{Reservation, SlotKey, TimeSlot, User};
use std::time::Duration;
use time::macros::date;

pub fn create_test_slot(capacity: i64) -> TimeSlot {
    TimeSlot::parse(date!(2026 - 01 - 15), "09:00", "10:00", capacity).unwrap()
}

pub fn create_test_users(store: &MemoryStore, count: usize) -> Vec<User> {
    (0..count)
        .map(|i| {
            store
                .add_user(&format!("user{i}@example.com"), &format!("User {i}"))
                .unwrap()
        })
        .collect()
}

/// A retry policy that never sleeps.
pub fn immediate_retry(max_attempts: u32) -> RetryPolicy {
    RetryPolicy::new()
        .with_max_attempts(max_attempts)
        .with_base_delay(Duration::ZERO)
        .with_jitter(false)
}

pub fn create_test_service(
    store: &MemoryStore,
) -> BookingService<MemoryStore> {
    BookingService::with_retry_policy(store.clone(), immediate_retry(5))
}

/// Wraps a `MemoryStore` and fails a configurable number of calls before
/// delegating.
#[derive(Debug, Clone, Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    pub fail_reserves: u32,
    pub fail_updates: u32,
    pub conflict_updates: u32,
    pub reserve_calls: u32,
    pub update_calls: u32,
}

impl FlakyStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }
}

impl UserDirectory for FlakyStore {
    fn exists(&mut self, user_id: i64) -> Result<bool, StoreError> {
        self.inner.exists(user_id)
    }

    fn find_by_id(&mut self, user_id: i64) -> Result<Option<User>, StoreError> {
        UserDirectory::find_by_id(&mut self.inner, user_id)
    }
}

impl ReservationRepository for FlakyStore {
    fn create(&mut self, draft: &Reservation) -> Result<Reservation, StoreError> {
        self.inner.create(draft)
    }

    fn find_by_id(&mut self, reservation_id: i64) -> Result<Option<Reservation>, StoreError> {
        ReservationRepository::find_by_id(&mut self.inner, reservation_id)
    }

    fn find_by_user_id(&mut self, user_id: i64) -> Result<Vec<Reservation>, StoreError> {
        self.inner.find_by_user_id(user_id)
    }

    fn update(&mut self, reservation: &Reservation) -> Result<Reservation, StoreError> {
        self.update_calls += 1;
        if self.fail_updates > 0 {
            self.fail_updates -= 1;
            return Err(StoreError::Transient(String::from("database is locked")));
        }
        if self.conflict_updates > 0 {
            self.conflict_updates -= 1;
            return Err(StoreError::VersionConflict {
                reservation_id: reservation.reservation_id().unwrap_or_default(),
            });
        }
        self.inner.update(reservation)
    }

    fn count_by_key(&mut self, key: &SlotKey) -> Result<u32, StoreError> {
        self.inner.count_by_key(key)
    }
}

impl CapacityLedger for FlakyStore {
    fn try_reserve(&mut self, draft: &Reservation) -> Result<Admission, StoreError> {
        self.reserve_calls += 1;
        if self.fail_reserves > 0 {
            self.fail_reserves -= 1;
            return Err(StoreError::Transient(String::from("database is locked")));
        }
        self.inner.try_reserve(draft)
    }
}
