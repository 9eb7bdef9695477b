// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{create_draft, create_test_persistence, create_test_slot, create_test_user};
use crate::{Persistence, PersistenceError};
use slotbook::{Admission, ReservationRepository};
use slotbook_domain::{Reservation, ReservationStatus, TimeSlot};
use time::OffsetDateTime;
use time::macros::date;

fn admit(persistence: &mut Persistence, user_id: i64, slot: TimeSlot) -> Reservation {
    match persistence
        .admit_reservation(&create_draft(user_id, slot))
        .unwrap()
    {
        Admission::Admitted(reservation) => reservation,
        Admission::Rejected { .. } => panic!("expected admission"),
    }
}

#[test]
fn test_admitted_reservation_is_pending_with_id() {
    let mut persistence = create_test_persistence();
    let user = create_test_user(&mut persistence, 1);

    let reservation = admit(&mut persistence, user.user_id, create_test_slot(2));

    assert!(reservation.reservation_id().is_some());
    assert_eq!(reservation.user_id(), user.user_id);
    assert_eq!(reservation.status(), ReservationStatus::Pending);
    assert_eq!(reservation.version(), 1);
    assert_eq!(*reservation.time_slot(), create_test_slot(2));
}

#[test]
fn test_get_reservation_returns_stored_state() {
    let mut persistence = create_test_persistence();
    let user = create_test_user(&mut persistence, 1);
    let admitted = admit(&mut persistence, user.user_id, create_test_slot(2));
    let id = admitted.reservation_id().unwrap();

    let first = persistence.get_reservation(id).unwrap().unwrap();
    let second = persistence.get_reservation(id).unwrap().unwrap();

    assert_eq!(first, admitted);
    assert_eq!(first, second);
}

#[test]
fn test_get_missing_reservation_returns_none() {
    let mut persistence = create_test_persistence();
    assert!(persistence.get_reservation(404).unwrap().is_none());
}

#[test]
fn test_list_reservations_for_user_in_creation_order() {
    let mut persistence = create_test_persistence();
    let alice = create_test_user(&mut persistence, 1);
    let bob = create_test_user(&mut persistence, 2);

    let slots = [
        TimeSlot::parse(date!(2026 - 01 - 15), "09:00", "10:00", 5).unwrap(),
        TimeSlot::parse(date!(2026 - 01 - 14), "18:00", "19:30", 5).unwrap(),
        TimeSlot::parse(date!(2026 - 01 - 16), "12:00", "13:00", 5).unwrap(),
    ];
    let ids: Vec<i64> = slots
        .iter()
        .map(|slot| admit(&mut persistence, alice.user_id, *slot).reservation_id().unwrap())
        .collect();
    admit(&mut persistence, bob.user_id, slots[0]);

    let listed: Vec<i64> = persistence
        .list_reservations_for_user(alice.user_id)
        .unwrap()
        .iter()
        .filter_map(Reservation::reservation_id)
        .collect();

    assert_eq!(listed, ids);
    assert!(persistence.list_reservations_for_user(999).unwrap().is_empty());
}

#[test]
fn test_update_persists_transition_and_bumps_version() {
    let mut persistence = create_test_persistence();
    let user = create_test_user(&mut persistence, 1);
    let mut reservation = admit(&mut persistence, user.user_id, create_test_slot(1));

    reservation.confirm().unwrap();
    let stored = persistence.update_reservation(&reservation).unwrap();

    assert_eq!(stored.status(), ReservationStatus::Confirmed);
    assert_eq!(stored.version(), 2);

    let reloaded = persistence
        .get_reservation(stored.reservation_id().unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(reloaded, stored);
}

#[test]
fn test_update_with_stale_version_conflicts() {
    let mut persistence = create_test_persistence();
    let user = create_test_user(&mut persistence, 1);
    let admitted = admit(&mut persistence, user.user_id, create_test_slot(1));
    let id = admitted.reservation_id().unwrap();

    let mut winner = admitted.clone();
    winner.confirm().unwrap();
    persistence.update_reservation(&winner).unwrap();

    let mut loser = admitted;
    loser.cancel().unwrap();
    let result = persistence.update_reservation(&loser);

    assert_eq!(
        result,
        Err(PersistenceError::VersionConflict { reservation_id: id })
    );
    let stored = persistence.get_reservation(id).unwrap().unwrap();
    assert_eq!(stored.status(), ReservationStatus::Confirmed);
    assert_eq!(stored.version(), 2);
}

#[test]
fn test_update_missing_reservation_is_not_found() {
    let mut persistence = create_test_persistence();
    let now = OffsetDateTime::now_utc();
    let ghost = Reservation::from_storage(
        999,
        1,
        create_test_slot(1),
        ReservationStatus::Cancelled,
        1,
        now,
        now,
    );

    let result = persistence.update_reservation(&ghost);

    assert!(matches!(result, Err(PersistenceError::NotFound(_))));
}

#[test]
fn test_insert_for_unknown_user_violates_foreign_key() {
    let mut persistence = create_test_persistence();

    let result = persistence.insert_reservation(&create_draft(12345, create_test_slot(1)));

    assert!(result.is_err());
    assert_eq!(persistence.ledger_count(&create_test_slot(1).key()).unwrap(), None);
}

#[test]
fn test_repository_trait_round_trip() {
    let mut persistence = create_test_persistence();
    let user = create_test_user(&mut persistence, 1);

    let created = persistence
        .create(&create_draft(user.user_id, create_test_slot(1)))
        .unwrap();
    let id = created.reservation_id().unwrap();

    assert_eq!(
        ReservationRepository::find_by_id(&mut persistence, id).unwrap(),
        Some(created.clone())
    );
    assert_eq!(
        persistence.find_by_user_id(user.user_id).unwrap(),
        vec![created]
    );
    assert_eq!(persistence.count_by_key(&create_test_slot(1).key()).unwrap(), 1);
}
