// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::password_policy::PasswordPolicyError;
use slotbook::{BookingError, ErrorKind, StoreError};
use slotbook_domain::DomainError;
use slotbook_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
/// Every variant carries a stable machine-readable code, see [`ApiError::code`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Invalid input was provided.
    InvalidInput {
        /// Stable error code.
        code: &'static str,
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// The caller is not allowed to act on the resource.
    Unauthorized {
        /// A human-readable description of the refusal.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// Stable error code.
        code: &'static str,
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// A booking rule was violated (full slot, illegal transition, taken e-mail).
    DomainRuleViolation {
        /// The rule that was violated, used as the stable code.
        rule: &'static str,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Password policy violation.
    PasswordPolicyViolation {
        /// A human-readable description of the policy violation.
        message: String,
    },
    /// Storage is contended or unreachable. The request may be repeated.
    ServiceUnavailable {
        /// A description of the storage failure.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// Returns the stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput { code, .. } | Self::ResourceNotFound { code, .. } => *code,
            Self::DomainRuleViolation { rule, .. } => *rule,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized.code(),
            Self::PasswordPolicyViolation { .. } => "password_policy_violation",
            Self::ServiceUnavailable { .. } => ErrorKind::Storage.code(),
            Self::Internal { .. } => "internal_error",
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput { field, message, .. } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::Unauthorized { message } => write!(f, "Unauthorized: {message}"),
            Self::ResourceNotFound {
                resource_type,
                message,
                ..
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::PasswordPolicyViolation { message } => {
                write!(f, "Password policy violation: {message}")
            }
            Self::ServiceUnavailable { message } => {
                write!(f, "Service unavailable: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

fn invalid_input(err: &DomainError, field: &str) -> ApiError {
    ApiError::InvalidInput {
        code: ErrorKind::from(err).code(),
        field: field.to_string(),
        message: err.to_string(),
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidCapacity { .. } => invalid_input(&err, "capacity"),
        DomainError::InvalidTimeRange { .. } => invalid_input(&err, "start_time"),
        DomainError::InvalidTimeSlot => invalid_input(&err, "time_slot"),
        DomainError::InvalidUser { .. } => invalid_input(&err, "user_id"),
        DomainError::InvalidDate { .. } => invalid_input(&err, "date"),
        DomainError::ReservationNotPending { .. } | DomainError::ReservationAlreadyCancelled => {
            ApiError::DomainRuleViolation {
                rule: ErrorKind::from(&err).code(),
                message: err.to_string(),
            }
        }
        // Only produced when reading a corrupt row back from storage.
        DomainError::InvalidReservationStatus(_) => ApiError::Internal {
            message: err.to_string(),
        },
    }
}

/// Translates a booking error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_booking_error(err: BookingError) -> ApiError {
    let code: &'static str = err.kind().code();
    match err {
        BookingError::Domain(domain_err) => translate_domain_error(domain_err),
        BookingError::UserNotFound { .. } => ApiError::ResourceNotFound {
            code,
            resource_type: String::from("User"),
            message: err.to_string(),
        },
        BookingError::ReservationNotFound { .. } => ApiError::ResourceNotFound {
            code,
            resource_type: String::from("Reservation"),
            message: err.to_string(),
        },
        BookingError::CapacityExceeded { .. } => ApiError::DomainRuleViolation {
            rule: code,
            message: err.to_string(),
        },
        BookingError::Unauthorized { .. } => ApiError::Unauthorized {
            message: err.to_string(),
        },
        BookingError::Storage(StoreError::Transient(_) | StoreError::VersionConflict { .. }) => {
            ApiError::ServiceUnavailable {
                message: err.to_string(),
            }
        }
        BookingError::Storage(_) => ApiError::Internal {
            message: err.to_string(),
        },
    }
}

/// Translates a persistence error raised outside the booking service
/// (registration, connection setup) into an API error.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::UniqueViolation(_) => ApiError::DomainRuleViolation {
            rule: "duplicate_email",
            message: String::from("A user with this e-mail address already exists"),
        },
        PersistenceError::Contention(_) | PersistenceError::DatabaseConnectionFailed(_) => {
            ApiError::ServiceUnavailable {
                message: err.to_string(),
            }
        }
        _ => ApiError::Internal {
            message: err.to_string(),
        },
    }
}
