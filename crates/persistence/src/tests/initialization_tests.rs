// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend initialization tests.
//!
//! Every other persistence test also goes through initialization, so these
//! only cover what the rest do not: isolation of in-memory instances, file
//! databases surviving a reconnect, and failure on an unusable path.

use super::{TempDatabase, create_test_persistence, create_test_user};
use crate::{ConnectionOptions, DatabaseTarget, Persistence, PersistenceError};
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn test_persistence_initialization() {
    let result: Result<Persistence, PersistenceError> = Persistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let mut db1 = create_test_persistence();
    let mut db2 = create_test_persistence();

    create_test_user(&mut db1, 1);

    assert!(db1.get_user_by_email("user1@example.com").unwrap().is_some());
    assert!(
        db2.get_user_by_email("user1@example.com").unwrap().is_none(),
        "db2 should not see users created in db1"
    );
}

#[test]
fn test_foreign_key_enforcement_is_verified() {
    let mut persistence = create_test_persistence();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_file_database_survives_reconnect() {
    let db = TempDatabase::new();
    let user_id = {
        let mut persistence = db.open();
        create_test_user(&mut persistence, 1).user_id
    };

    let mut reconnected = db.connect();
    let user = reconnected.get_user(user_id).unwrap().expect("user should persist");
    assert_eq!(user.email, "user1@example.com");
}

#[test]
fn test_open_is_idempotent() {
    let db = TempDatabase::new();
    drop(db.open());
    // Migrations already applied; opening again must not fail.
    drop(db.open());
}

#[test]
fn test_connect_applies_busy_timeout_option() {
    let db = TempDatabase::new();
    drop(db.open());

    let options = ConnectionOptions {
        busy_timeout: Duration::from_millis(250),
    };
    assert!(Persistence::connect(&db.target(), options).is_ok());
}

#[test]
fn test_open_fails_for_unusable_path() {
    let target = DatabaseTarget::Sqlite(PathBuf::from(
        "/nonexistent-slotbook-dir/nested/slotbook.db",
    ));

    let result = Persistence::open(&target, ConnectionOptions::default());
    assert!(result.is_err());
}

#[test]
fn test_default_connection_options() {
    assert_eq!(
        ConnectionOptions::default().busy_timeout,
        crate::DEFAULT_BUSY_TIMEOUT
    );
}
