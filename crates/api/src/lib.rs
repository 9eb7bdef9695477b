// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the Slotbook booking engine.
//!
//! Request/response DTOs, the explicit translation of booking and
//! persistence errors into [`ApiError`], and one handler function per
//! operation. Nothing here knows about HTTP.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod handlers;
mod password_policy;
mod request_response;

#[cfg(test)]
mod tests;

pub use error::{
    ApiError, translate_booking_error, translate_domain_error, translate_persistence_error,
};
pub use handlers::{
    cancel_reservation, confirm_reservation, create_reservation, get_reservation,
    list_user_reservations, register_user,
};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    CreateReservationRequest, ListReservationsResponse, RegisterUserRequest, ReservationResponse,
    TransitionReservationRequest, UserResponse,
};
