// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod concurrency_tests;
mod initialization_tests;
mod reservation_tests;
mod user_tests;

use crate::{ConnectionOptions, DatabaseTarget, Persistence};
use slotbook_domain::{Reservation, TimeSlot, User};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use time::macros::date;

/// Lowest cost bcrypt accepts; keeps user creation fast in tests.
pub const TEST_HASH_COST: u32 = 4;

static TEMP_DB_COUNTER: AtomicU64 = AtomicU64::new(0);

pub fn create_test_persistence() -> Persistence {
    let mut persistence = Persistence::new_in_memory().expect("Failed to create in-memory database");
    persistence.set_password_hash_cost(TEST_HASH_COST);
    persistence
}

pub fn create_test_user(persistence: &mut Persistence, n: usize) -> User {
    persistence
        .create_user(
            &format!("user{n}@example.com"),
            &format!("User {n}"),
            "correct horse battery staple",
        )
        .expect("Failed to create test user")
}

pub fn create_test_slot(capacity: i64) -> TimeSlot {
    TimeSlot::parse(date!(2026 - 01 - 15), "09:00", "10:00", capacity).unwrap()
}

pub fn create_draft(user_id: i64, slot: TimeSlot) -> Reservation {
    Reservation::new(user_id, Some(slot)).unwrap()
}

/// A file-backed `SQLite` database that is removed, with its WAL files,
/// when dropped.
pub struct TempDatabase {
    pub path: PathBuf,
}

impl TempDatabase {
    pub fn new() -> Self {
        let n = TEMP_DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "slotbook_test_{}_{n}.db",
            std::process::id()
        ));
        let db = Self { path };
        db.remove_files();
        db
    }

    pub fn target(&self) -> DatabaseTarget {
        DatabaseTarget::Sqlite(self.path.clone())
    }

    /// Opens the database, running migrations.
    pub fn open(&self) -> Persistence {
        let mut persistence = Persistence::open(&self.target(), ConnectionOptions::default())
            .expect("Failed to open file database");
        persistence.set_password_hash_cost(TEST_HASH_COST);
        persistence
    }

    /// Opens an additional connection without migrating.
    pub fn connect(&self) -> Persistence {
        Persistence::connect(&self.target(), ConnectionOptions::default())
            .expect("Failed to connect to file database")
    }

    fn remove_files(&self) {
        let base = self.path.display().to_string();
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{base}{suffix}"));
        }
    }
}

impl Drop for TempDatabase {
    fn drop(&mut self) {
        self.remove_files();
    }
}
