// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use slotbook::{BookingService, MemoryStore, RetryPolicy};
use slotbook_persistence::Persistence;

use crate::{CreateReservationRequest, RegisterUserRequest};

pub fn create_test_service() -> (BookingService<MemoryStore>, Vec<i64>) {
    let store: MemoryStore = MemoryStore::new();
    let users: Vec<i64> = (1..=3)
        .map(|n| {
            store
                .add_user(&format!("user{n}@example.com"), &format!("User {n}"))
                .unwrap()
                .user_id
        })
        .collect();
    (
        BookingService::with_retry_policy(store, RetryPolicy::no_retry()),
        users,
    )
}

pub fn create_test_request(user_id: i64, capacity: i64) -> CreateReservationRequest {
    CreateReservationRequest {
        user_id,
        date: String::from("2026-01-15"),
        start_time: String::from("09:00"),
        end_time: String::from("10:00"),
        capacity,
    }
}

pub fn create_test_persistence() -> Persistence {
    let mut persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    persistence.set_password_hash_cost(4);
    persistence
}

pub fn create_test_registration(email: &str) -> RegisterUserRequest {
    RegisterUserRequest {
        email: email.to_string(),
        name: String::from("Test User"),
        password: String::from("hunter22"),
    }
}
