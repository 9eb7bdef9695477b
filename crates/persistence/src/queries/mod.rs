// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-agnostic query modules.
//!
//! All queries use Diesel DSL and work across all supported backends.
//!
//! - `reservations`: reservation lookups and slot counts
//! - `users`: user directory lookups

pub mod reservations;
pub mod users;

pub use reservations::{
    count_active_by_key_mysql, count_active_by_key_sqlite, find_reservation_mysql,
    find_reservation_sqlite, find_reservations_by_user_mysql, find_reservations_by_user_sqlite,
    ledger_reserved_count_mysql, ledger_reserved_count_sqlite,
};
pub use users::{
    find_user_by_email_mysql, find_user_by_email_sqlite, find_user_mysql, find_user_sqlite,
    user_exists_mysql, user_exists_sqlite,
};
