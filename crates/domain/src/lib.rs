// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod reservation;
mod time_slot;
mod types;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use reservation::{Reservation, ReservationStatus};
pub use time_slot::{SlotKey, TimeSlot, format_date, format_time, parse_date};
pub use types::{User, normalize_email};
