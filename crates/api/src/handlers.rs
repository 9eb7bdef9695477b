// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions.
//!
//! Handlers are synchronous and transport-agnostic: they take a booking
//! service (or the persistence adapter, for registration), translate the
//! request into domain types, and translate every failure into an
//! [`ApiError`]. The HTTP server decides on which thread they run.

use slotbook::{BookingService, BookingStore};
use slotbook_domain::{Reservation, TimeSlot, User, parse_date};
use slotbook_persistence::Persistence;
use time::Date;
use tracing::{debug, info};

use crate::error::{
    ApiError, translate_booking_error, translate_domain_error, translate_persistence_error,
};
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    CreateReservationRequest, ListReservationsResponse, RegisterUserRequest, ReservationResponse,
    TransitionReservationRequest, UserResponse,
};

/// Minimum display name length, in characters.
const MIN_NAME_LENGTH: usize = 2;

/// Books one unit of the requested time slot.
///
/// # Errors
///
/// Returns an `ApiError` if the slot is invalid, the user does not exist,
/// the slot is full, or storage fails.
pub fn create_reservation<S: BookingStore>(
    service: &mut BookingService<S>,
    request: CreateReservationRequest,
) -> Result<ReservationResponse, ApiError> {
    info!(
        user_id = request.user_id,
        date = %request.date,
        start_time = %request.start_time,
        end_time = %request.end_time,
        capacity = request.capacity,
        "Handling create_reservation request"
    );

    let date: Date = parse_date(&request.date).map_err(translate_domain_error)?;
    let time_slot: TimeSlot = TimeSlot::parse(
        date,
        &request.start_time,
        &request.end_time,
        request.capacity,
    )
    .map_err(translate_domain_error)?;

    let reservation: Reservation = service
        .create_reservation(request.user_id, Some(time_slot))
        .map_err(translate_booking_error)?;

    ReservationResponse::from_reservation(&reservation)
}

/// Retrieves a reservation by id.
///
/// # Errors
///
/// Returns an `ApiError` if the reservation does not exist or storage fails.
pub fn get_reservation<S: BookingStore>(
    service: &mut BookingService<S>,
    reservation_id: i64,
) -> Result<ReservationResponse, ApiError> {
    let reservation: Reservation = service
        .get_reservation(reservation_id)
        .map_err(translate_booking_error)?;

    ReservationResponse::from_reservation(&reservation)
}

/// Lists every reservation of a user, in creation order.
///
/// An unknown user yields an empty list.
///
/// # Errors
///
/// Returns an `ApiError` if storage fails.
pub fn list_user_reservations<S: BookingStore>(
    service: &mut BookingService<S>,
    user_id: i64,
) -> Result<ListReservationsResponse, ApiError> {
    let reservations: Vec<Reservation> = service
        .get_user_reservations(user_id)
        .map_err(translate_booking_error)?;

    debug!(user_id, count = reservations.len(), "Listing reservations");

    Ok(ListReservationsResponse {
        user_id,
        reservations: reservations
            .iter()
            .map(ReservationResponse::from_reservation)
            .collect::<Result<Vec<_>, _>>()?,
    })
}

/// Confirms a pending reservation on behalf of its owner.
///
/// # Errors
///
/// Returns an `ApiError` if the reservation does not exist, the caller is not
/// the owner, the reservation is not pending, or storage fails.
pub fn confirm_reservation<S: BookingStore>(
    service: &mut BookingService<S>,
    reservation_id: i64,
    request: TransitionReservationRequest,
) -> Result<ReservationResponse, ApiError> {
    info!(
        reservation_id,
        user_id = request.user_id,
        "Handling confirm_reservation request"
    );

    let reservation: Reservation = service
        .confirm_reservation(reservation_id, request.user_id)
        .map_err(translate_booking_error)?;

    ReservationResponse::from_reservation(&reservation)
}

/// Cancels a reservation on behalf of its owner, releasing its capacity.
///
/// # Errors
///
/// Returns an `ApiError` if the reservation does not exist, the caller is not
/// the owner, the reservation is already cancelled, or storage fails.
pub fn cancel_reservation<S: BookingStore>(
    service: &mut BookingService<S>,
    reservation_id: i64,
    request: TransitionReservationRequest,
) -> Result<ReservationResponse, ApiError> {
    info!(
        reservation_id,
        user_id = request.user_id,
        "Handling cancel_reservation request"
    );

    let reservation: Reservation = service
        .cancel_reservation(reservation_id, request.user_id)
        .map_err(translate_booking_error)?;

    ReservationResponse::from_reservation(&reservation)
}

/// Registers a user.
///
/// # Errors
///
/// Returns an `ApiError` if a field is invalid, the password violates the
/// policy, the e-mail is already registered, or storage fails.
pub fn register_user(
    persistence: &mut Persistence,
    request: &RegisterUserRequest,
    policy: &PasswordPolicy,
) -> Result<UserResponse, ApiError> {
    validate_email(&request.email)?;

    let name: &str = request.name.trim();
    if name.chars().count() < MIN_NAME_LENGTH {
        return Err(ApiError::InvalidInput {
            code: "invalid_name",
            field: String::from("name"),
            message: format!("Name must be at least {MIN_NAME_LENGTH} characters long"),
        });
    }

    policy.validate(&request.password, &request.email, name)?;

    let user: User = persistence
        .create_user(&request.email, name, &request.password)
        .map_err(translate_persistence_error)?;

    UserResponse::from_user(&user)
}

/// Checks the shape `local@domain.tld`: one `@`, non-empty local part, a
/// dotted domain without empty labels, and an alphabetic TLD of at least two
/// characters.
fn validate_email(email: &str) -> Result<(), ApiError> {
    let invalid = |message: &str| ApiError::InvalidInput {
        code: "invalid_email",
        field: String::from("email"),
        message: message.to_string(),
    };

    let email: &str = email.trim();
    if email.is_empty() {
        return Err(invalid("E-mail is required"));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(invalid("E-mail must contain '@'"));
    };

    let local_ok: bool = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c));
    let labels: Vec<&str> = domain.split('.').collect();
    let domain_ok: bool = labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && label
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
        && labels
            .last()
            .is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()));

    if local_ok && domain_ok {
        Ok(())
    } else {
        Err(invalid("E-mail address is not valid"))
    }
}

#[cfg(test)]
mod tests {
    use super::validate_email;

    #[test]
    fn test_validate_email_accepts_common_forms() {
        for email in [
            "alice@example.com",
            "Alice.Smith+tag@mail.example.co",
            " bob@example.org ",
        ] {
            assert!(validate_email(email).is_ok(), "{email} should be valid");
        }
    }

    #[test]
    fn test_validate_email_rejects_malformed() {
        for email in [
            "",
            "alice",
            "@example.com",
            "alice@",
            "alice@example",
            "alice@example.c",
            "alice@@example.com",
            "alice@exa mple.com",
            "alice@example..com",
        ] {
            assert!(validate_email(email).is_err(), "{email} should be invalid");
        }
    }
}
