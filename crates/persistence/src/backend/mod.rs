// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Database backend-specific code.
//!
//! This module isolates connection setup, migrations and the few helpers
//! that cannot be expressed in backend-agnostic Diesel DSL.
//!
//! ## Backend Support
//!
//! - `sqlite`: `SQLite` backend (default for development and testing)
//! - `mysql`: MySQL/MariaDB backend (validated via opt-in tests)
//!
//! Transaction flavour is also backend-specific: `SQLite` admissions run under
//! `BEGIN IMMEDIATE`, `MySQL` under a plain `InnoDB` transaction. That choice
//! is made in the `Persistence` adapter, not here.

pub mod mysql;
pub mod sqlite;

use diesel::{Connection, MysqlConnection, SqliteConnection};

use crate::error::PersistenceError;

/// Backend-specific operations shared by query and mutation functions.
pub trait PersistenceBackend: Connection {
    /// Retrieves the last inserted row ID on this connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError>;

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError>;

    /// Ensures the ledger row for a slot key exists and is locked against
    /// other writers until the transaction ends.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    fn lock_ledger_row(
        &mut self,
        slot_date: &str,
        start_time: &str,
        end_time: &str,
    ) -> Result<(), PersistenceError>;
}

impl PersistenceBackend for SqliteConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        sqlite::get_last_insert_rowid(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        sqlite::verify_foreign_key_enforcement(self)
    }

    fn lock_ledger_row(
        &mut self,
        slot_date: &str,
        start_time: &str,
        end_time: &str,
    ) -> Result<(), PersistenceError> {
        sqlite::lock_ledger_row(self, slot_date, start_time, end_time)
    }
}

impl PersistenceBackend for MysqlConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        mysql::get_last_insert_rowid(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        mysql::verify_foreign_key_enforcement(self)
    }

    fn lock_ledger_row(
        &mut self,
        slot_date: &str,
        start_time: &str,
        end_time: &str,
    ) -> Result<(), PersistenceError> {
        mysql::lock_ledger_row(self, slot_date, start_time, end_time)
    }
}
