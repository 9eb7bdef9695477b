// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{create_test_service, create_test_slot, create_test_users};
use crate::{BookingError, ErrorKind, MemoryStore, ReservationRepository};
use slotbook_domain::{Reservation, ReservationStatus};
use std::sync::{Arc, Barrier};
use std::thread;

fn run_concurrent<F>(threads: usize, f: F) -> Vec<Result<Reservation, BookingError>>
where
    F: Fn(usize) -> Result<Reservation, BookingError> + Send + Sync + 'static,
{
    let barrier = Arc::new(Barrier::new(threads));
    let f = Arc::new(f);

    let handles: Vec<_> = (0..threads)
        .map(|i| {
            let barrier = Arc::clone(&barrier);
            let f = Arc::clone(&f);
            thread::spawn(move || {
                barrier.wait();
                f(i)
            })
        })
        .collect();

    handles.into_iter().map(|h| h.join().unwrap()).collect()
}

#[test]
fn test_concurrent_admissions_never_overbook() {
    const CAPACITY: i64 = 3;
    const ATTEMPTS: usize = 16;

    let store = MemoryStore::new();
    let users = create_test_users(&store, ATTEMPTS);
    let slot = create_test_slot(CAPACITY);

    let results = {
        let store = store.clone();
        run_concurrent(ATTEMPTS, move |i| {
            let mut service = create_test_service(&store);
            service.create_reservation(users[i].user_id, Some(slot))
        })
    };

    let admitted = results.iter().filter(|r| r.is_ok()).count();
    let rejected = results
        .iter()
        .filter(|r| matches!(r, Err(e) if e.kind() == ErrorKind::CapacityExceeded))
        .count();

    assert_eq!(admitted, 3);
    assert_eq!(rejected, ATTEMPTS - 3);
    assert_eq!(store.clone().count_by_key(&slot.key()).unwrap(), 3);
}

#[test]
fn test_concurrent_cancels_apply_once() {
    let store = MemoryStore::new();
    let users = create_test_users(&store, 1);
    let owner = users[0].user_id;
    let id = create_test_service(&store)
        .create_reservation(owner, Some(create_test_slot(1)))
        .unwrap()
        .reservation_id()
        .unwrap();

    let results = {
        let store = store.clone();
        run_concurrent(8, move |_| {
            create_test_service(&store).cancel_reservation(id, owner)
        })
    };

    let applied = results.iter().filter(|r| r.is_ok()).count();
    let already = results
        .iter()
        .filter(|r| matches!(r, Err(e) if e.kind() == ErrorKind::ReservationAlreadyCancelled))
        .count();

    assert_eq!(applied, 1);
    assert_eq!(already, 7);
    let stored = create_test_service(&store).get_reservation(id).unwrap();
    assert_eq!(stored.version(), 2);
}

#[test]
fn test_concurrent_confirm_and_cancel() {
    let store = MemoryStore::new();
    let users = create_test_users(&store, 1);
    let owner = users[0].user_id;
    let id = create_test_service(&store)
        .create_reservation(owner, Some(create_test_slot(1)))
        .unwrap()
        .reservation_id()
        .unwrap();

    let results = {
        let store = store.clone();
        run_concurrent(2, move |i| {
            let mut service = create_test_service(&store);
            if i == 0 {
                service.confirm_reservation(id, owner)
            } else {
                service.cancel_reservation(id, owner)
            }
        })
    };

    let stored = create_test_service(&store).get_reservation(id).unwrap();
    let applied = results.iter().filter(|r| r.is_ok()).count();

    // Either cancel won (confirm then fails) or confirm won and cancel followed.
    assert_eq!(stored.status(), ReservationStatus::Cancelled);
    assert_eq!(stored.version(), 1 + i64::try_from(applied).unwrap());
    if applied == 1 {
        assert_eq!(
            results[0].as_ref().unwrap_err().kind(),
            ErrorKind::ReservationNotPending
        );
    } else {
        assert_eq!(applied, 2);
    }
}

#[test]
fn test_cancel_releases_capacity_for_later_attempts() {
    let store = MemoryStore::new();
    let users = create_test_users(&store, 6);
    let slot = create_test_slot(2);
    let mut service = create_test_service(&store);

    let first = service
        .create_reservation(users[0].user_id, Some(slot))
        .unwrap();
    service
        .create_reservation(users[1].user_id, Some(slot))
        .unwrap();
    service
        .cancel_reservation(first.reservation_id().unwrap(), users[0].user_id)
        .unwrap();

    let results = {
        let store = store.clone();
        let users = users.clone();
        run_concurrent(4, move |i| {
            create_test_service(&store).create_reservation(users[i + 2].user_id, Some(slot))
        })
    };

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(service.store_mut().count_by_key(&slot.key()).unwrap(), 2);
}
