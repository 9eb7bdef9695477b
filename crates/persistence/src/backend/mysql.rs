// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! MySQL/MariaDB-specific persistence utilities.
//!
//! `MySQL` support is compiled by default and validated by the `#[ignore]`
//! tests in `tests/backend_validation_tests.rs`, which `cargo xtask
//! test-mariadb` runs against a throwaway `MariaDB` container with
//! `DATABASE_URL` and `SLOTBOOK_TEST_BACKEND=mariadb` set.
//!
//! `migrations_mysql/` must stay schema-equivalent to `migrations/`: same
//! tables, columns, constraints, foreign keys and indexes, in `MySQL` syntax.
//!
//! Admission locks the `slot_ledger` row exclusively before reading or
//! updating it, see [`lock_ledger_row`].

use diesel::dsl::sql;
use diesel::sql_types::{BigInt, Integer, Text};
use diesel::{Connection, MysqlConnection, QueryableByName, RunQueryDsl};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

use crate::error::PersistenceError;

/// Result type for foreign key check query.
#[derive(QueryableByName)]
struct ForeignKeyCheck {
    #[diesel(sql_type = Integer)]
    fk_checks: i32,
}

/// Returns `LAST_INSERT_ID()` for this connection.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_last_insert_rowid(conn: &mut MysqlConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("LAST_INSERT_ID()")).get_result(conn)?)
}

/// Creates the ledger row for a slot key if missing and takes an exclusive
/// lock on it.
///
/// `INSERT IGNORE` on an existing key only takes a shared lock, and two
/// admissions holding it both wait for the exclusive lock of the following
/// `UPDATE`, which `InnoDB` resolves by aborting one as a deadlock. The no-op
/// `ON DUPLICATE KEY UPDATE` takes the exclusive lock at once, so admissions
/// on one key queue behind each other instead.
///
/// # Errors
///
/// Returns an error if the statement fails.
pub fn lock_ledger_row(
    conn: &mut MysqlConnection,
    slot_date: &str,
    start_time: &str,
    end_time: &str,
) -> Result<(), PersistenceError> {
    diesel::sql_query(
        "INSERT INTO slot_ledger (slot_date, start_time, end_time, reserved_count) \
         VALUES (?, ?, ?, 0) \
         ON DUPLICATE KEY UPDATE reserved_count = reserved_count",
    )
    .bind::<Text, _>(slot_date)
    .bind::<Text, _>(start_time)
    .bind::<Text, _>(end_time)
    .execute(conn)?;
    Ok(())
}

/// `MySQL`-specific migrations.
pub const MYSQL_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations_mysql");

/// Opens a connection without migrating.
///
/// # Errors
///
/// Returns an error if the connection fails.
pub fn connect(database_url: &str) -> Result<MysqlConnection, PersistenceError> {
    MysqlConnection::establish(database_url)
        .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))
}

/// Initialize a `MySQL` database at the given URL and run migrations.
///
/// # Errors
///
/// Returns an error if connection or migration fails.
pub fn initialize_database(database_url: &str) -> Result<MysqlConnection, PersistenceError> {
    info!("Initializing MySQL database");

    let mut conn: MysqlConnection = connect(database_url)?;
    run_migrations(&mut conn).map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;

    Ok(conn)
}

/// Run pending migrations on the provided `MySQL` connection.
///
/// # Errors
///
/// Returns an error if migration execution fails.
pub fn run_migrations(
    conn: &mut MysqlConnection,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("Running MySQL database migrations");
    conn.run_pending_migrations(MYSQL_MIGRATIONS)?;
    Ok(())
}

/// Verify that foreign key enforcement is enabled on `MySQL`.
///
/// # Errors
///
/// Returns an error if verification fails.
pub fn verify_foreign_key_enforcement(conn: &mut MysqlConnection) -> Result<(), PersistenceError> {
    // NOTE: raw SQL, Diesel has no system variable DSL
    let check: ForeignKeyCheck = diesel::sql_query("SELECT @@foreign_key_checks AS fk_checks")
        .get_result(conn)
        .map_err(|e| {
            PersistenceError::QueryFailed(format!("Failed to verify foreign key enforcement: {e}"))
        })?;

    if check.fk_checks == 1 {
        debug!("MySQL foreign key enforcement is enabled");
        Ok(())
    } else {
        Err(PersistenceError::ForeignKeyEnforcementNotEnabled)
    }
}
