// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-agnostic mutation modules.
//!
//! - `ledger`: admission against slot capacity and unchecked inserts
//! - `reservations`: version-guarded status transitions
//! - `users`: user registration
//!
//! None of these open a transaction. Callers in the `Persistence` adapter
//! wrap them in the transaction flavour their backend needs.

pub mod ledger;
pub mod reservations;
pub mod users;

pub use ledger::{
    admit_reservation_mysql, admit_reservation_sqlite, insert_reservation_mysql,
    insert_reservation_sqlite,
};
pub use reservations::{update_reservation_mysql, update_reservation_sqlite};
pub use users::{create_user_mysql, create_user_sqlite};
