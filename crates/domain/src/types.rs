// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::OffsetDateTime;

/// A registered user who may own reservations.
///
/// Credentials are not part of this type; they stay in the storage layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Storage-assigned identifier.
    pub user_id: i64,
    /// Lowercased e-mail address, unique across users.
    pub email: String,
    /// Display name.
    pub name: String,
    /// When the user was registered.
    pub created_at: OffsetDateTime,
}

/// Normalizes an e-mail address for storage and lookup.
///
/// Surrounding whitespace is dropped and the address is lowercased.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
