// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::create_test_slot;
use crate::{BookingError, ErrorKind, StoreError};
use slotbook_domain::{DomainError, ReservationStatus};

#[test]
fn test_domain_errors_keep_their_kind() {
    let cases = [
        (
            DomainError::InvalidCapacity { capacity: 0 },
            ErrorKind::InvalidCapacity,
        ),
        (
            DomainError::InvalidTimeRange {
                start_time: String::from("10:00"),
                end_time: String::from("09:00"),
            },
            ErrorKind::InvalidTimeRange,
        ),
        (DomainError::InvalidTimeSlot, ErrorKind::InvalidTimeSlot),
        (DomainError::InvalidUser { user_id: 0 }, ErrorKind::InvalidUser),
        (
            DomainError::InvalidDate {
                date_string: String::from("x"),
            },
            ErrorKind::InvalidDate,
        ),
        (
            DomainError::ReservationNotPending {
                status: ReservationStatus::Cancelled,
            },
            ErrorKind::ReservationNotPending,
        ),
        (
            DomainError::ReservationAlreadyCancelled,
            ErrorKind::ReservationAlreadyCancelled,
        ),
    ];

    for (domain, kind) in cases {
        let err = BookingError::from(domain.clone());
        assert_eq!(err.kind(), kind);
        assert_eq!(err.to_string(), domain.to_string());
    }
}

#[test]
fn test_service_error_codes_are_stable() {
    assert_eq!(ErrorKind::InvalidCapacity.code(), "invalid_capacity");
    assert_eq!(ErrorKind::InvalidTimeRange.code(), "invalid_time_range");
    assert_eq!(ErrorKind::InvalidTimeSlot.code(), "invalid_time_slot");
    assert_eq!(ErrorKind::InvalidUser.code(), "invalid_user");
    assert_eq!(ErrorKind::UserNotFound.code(), "user_not_found");
    assert_eq!(ErrorKind::ReservationNotFound.code(), "reservation_not_found");
    assert_eq!(ErrorKind::CapacityExceeded.code(), "capacity_exceeded");
    assert_eq!(ErrorKind::ReservationNotPending.code(), "reservation_not_pending");
    assert_eq!(
        ErrorKind::ReservationAlreadyCancelled.code(),
        "reservation_already_cancelled"
    );
    assert_eq!(ErrorKind::Unauthorized.code(), "unauthorized");
    assert_eq!(ErrorKind::Storage.code(), "storage_unavailable");
}

#[test]
fn test_capacity_exceeded_display() {
    let slot = create_test_slot(1);
    let err = BookingError::CapacityExceeded {
        slot: slot.key(),
        reserved: 1,
        capacity: 1,
    };

    assert_eq!(
        err.to_string(),
        "Time slot 2026-01-15 09:00-10:00 is full (1 of 1 reserved)"
    );
}

#[test]
fn test_only_contention_is_retryable() {
    assert!(BookingError::Storage(StoreError::Transient(String::from("busy"))).is_retryable());
    assert!(BookingError::Storage(StoreError::VersionConflict { reservation_id: 1 }).is_retryable());
    assert!(!BookingError::Storage(StoreError::Backend(String::from("disk"))).is_retryable());
    assert!(!BookingError::UserNotFound { user_id: 1 }.is_retryable());
    assert!(
        !BookingError::Domain(DomainError::ReservationAlreadyCancelled).is_retryable()
    );
}
