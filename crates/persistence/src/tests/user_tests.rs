// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{create_test_persistence, create_test_user};
use crate::diesel_schema::users;
use crate::{BackendConnection, PersistenceError};
use diesel::prelude::*;
use slotbook::UserDirectory;

#[test]
fn test_create_user_assigns_id_and_normalizes_email() {
    let mut persistence = create_test_persistence();

    let user = persistence
        .create_user("  Alice@Example.COM ", "Alice", "password123")
        .unwrap();

    assert!(user.user_id > 0);
    assert_eq!(user.email, "alice@example.com");
    assert_eq!(user.name, "Alice");
}

#[test]
fn test_duplicate_email_is_rejected_case_insensitively() {
    let mut persistence = create_test_persistence();
    persistence
        .create_user("bob@example.com", "Bob", "password123")
        .unwrap();

    let result = persistence.create_user("BOB@example.com", "Bobby", "password456");

    assert!(matches!(result, Err(PersistenceError::UniqueViolation(_))));
}

#[test]
fn test_get_user_by_email_ignores_case() {
    let mut persistence = create_test_persistence();
    let created = create_test_user(&mut persistence, 7);

    let found = persistence
        .get_user_by_email("USER7@EXAMPLE.COM")
        .unwrap()
        .unwrap();

    assert_eq!(found.user_id, created.user_id);
}

#[test]
fn test_get_user_round_trips() {
    let mut persistence = create_test_persistence();
    let created = create_test_user(&mut persistence, 1);

    let found = persistence.get_user(created.user_id).unwrap().unwrap();

    assert_eq!(found, created);
}

#[test]
fn test_unknown_user_does_not_exist() {
    let mut persistence = create_test_persistence();
    let created = create_test_user(&mut persistence, 1);

    assert!(persistence.user_exists(created.user_id).unwrap());
    assert!(!persistence.user_exists(created.user_id + 100).unwrap());
    assert!(persistence.get_user(created.user_id + 100).unwrap().is_none());
}

#[test]
fn test_user_directory_trait_delegates() {
    let mut persistence = create_test_persistence();
    let created = create_test_user(&mut persistence, 1);

    assert!(UserDirectory::exists(&mut persistence, created.user_id).unwrap());
    assert_eq!(
        UserDirectory::find_by_id(&mut persistence, created.user_id).unwrap(),
        Some(created)
    );
}

#[test]
fn test_password_is_stored_as_bcrypt_hash() {
    let mut persistence = create_test_persistence();
    let created = persistence
        .create_user("carol@example.com", "Carol", "s3cret-pass")
        .unwrap();

    let BackendConnection::Sqlite(conn) = &mut persistence.conn else {
        panic!("expected SQLite backend");
    };
    let hash: String = users::table
        .find(created.user_id)
        .select(users::password_hash)
        .first(conn)
        .unwrap();

    assert_ne!(hash, "s3cret-pass");
    assert!(bcrypt::verify("s3cret-pass", &hash).unwrap());
    assert!(!bcrypt::verify("wrong-pass", &hash).unwrap());
}
