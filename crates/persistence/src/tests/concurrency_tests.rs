// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Admission and transition races against a file-backed `SQLite` database,
//! one connection per thread.

use super::{TempDatabase, create_test_slot, create_test_user};
use slotbook::{BookingError, BookingService, ErrorKind, RetryPolicy};
use slotbook_domain::{Reservation, ReservationStatus};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

fn retry_policy() -> RetryPolicy {
    RetryPolicy::new()
        .with_max_attempts(10)
        .with_base_delay(Duration::from_millis(5))
}

fn run_concurrent<F>(
    db: &Arc<TempDatabase>,
    threads: usize,
    f: F,
) -> Vec<Result<Reservation, BookingError>>
where
    F: Fn(&mut BookingService<crate::Persistence>, usize) -> Result<Reservation, BookingError>
        + Send
        + Sync
        + 'static,
{
    let barrier = Arc::new(Barrier::new(threads));
    let f = Arc::new(f);

    let handles: Vec<_> = (0..threads)
        .map(|i| {
            let barrier = Arc::clone(&barrier);
            let db = Arc::clone(db);
            let f = Arc::clone(&f);
            thread::spawn(move || {
                let mut service = BookingService::with_retry_policy(db.connect(), retry_policy());
                barrier.wait();
                f(&mut service, i)
            })
        })
        .collect();

    handles.into_iter().map(|h| h.join().unwrap()).collect()
}

#[test]
fn test_concurrent_admissions_admit_exactly_capacity() {
    const CAPACITY: i64 = 4;
    const ATTEMPTS: usize = 12;

    let db = Arc::new(TempDatabase::new());
    let mut persistence = db.open();
    let users: Vec<i64> = (0..ATTEMPTS)
        .map(|n| create_test_user(&mut persistence, n).user_id)
        .collect();
    let slot = create_test_slot(CAPACITY);

    let results = run_concurrent(&db, ATTEMPTS, move |service, i| {
        service.create_reservation(users[i], Some(slot))
    });

    let admitted = results.iter().filter(|r| r.is_ok()).count();
    let rejected = results
        .iter()
        .filter(|r| matches!(r, Err(e) if e.kind() == ErrorKind::CapacityExceeded))
        .count();

    assert_eq!(admitted, 4);
    assert_eq!(rejected, ATTEMPTS - 4);
    assert_eq!(persistence.ledger_count(&slot.key()).unwrap(), Some(4));
    assert_eq!(persistence.count_active_reservations(&slot.key()).unwrap(), 4);
}

#[test]
fn test_concurrent_cancels_apply_once() {
    let db = Arc::new(TempDatabase::new());
    let mut persistence = db.open();
    let owner = create_test_user(&mut persistence, 1).user_id;
    let slot = create_test_slot(1);

    let id = BookingService::new(db.connect())
        .create_reservation(owner, Some(slot))
        .unwrap()
        .reservation_id()
        .unwrap();

    let results = run_concurrent(&db, 6, move |service, _| {
        service.cancel_reservation(id, owner)
    });

    let applied = results.iter().filter(|r| r.is_ok()).count();
    let already = results
        .iter()
        .filter(|r| matches!(r, Err(e) if e.kind() == ErrorKind::ReservationAlreadyCancelled))
        .count();

    assert_eq!(applied, 1);
    assert_eq!(already, 5);

    let stored = persistence.get_reservation(id).unwrap().unwrap();
    assert_eq!(stored.status(), ReservationStatus::Cancelled);
    assert_eq!(stored.version(), 2);
    assert_eq!(persistence.ledger_count(&slot.key()).unwrap(), Some(0));
}
