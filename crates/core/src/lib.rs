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
mod memory;
mod repository;
mod retry;
mod service;

#[cfg(test)]
mod tests;

// Re-export public types
pub use error::{BookingError, ErrorKind};
pub use memory::MemoryStore;
pub use repository::{
    Admission, BookingStore, CapacityLedger, ReservationRepository, StoreError, UserDirectory,
};
pub use retry::RetryPolicy;
pub use service::BookingService;
