// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::password_policy::PasswordPolicyError;
use vibemon_domain::DomainError;
use vibemon_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The account has been deactivated.
    AccountDeactivated,
    /// The account has not been approved yet.
    PendingApproval,
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The roles allowed to perform this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::AccountDeactivated => write!(f, "Account is deactivated"),
            Self::PendingApproval => write!(f, "Account pending approval"),
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain and persistence errors and represent the
/// API contract. Each variant maps to exactly one HTTP status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed (401).
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The actor's role does not permit the action (403).
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The roles allowed to perform this action.
        required_role: String,
    },
    /// The action is never permitted on this target (403).
    Forbidden {
        /// A human-readable description of the refusal.
        message: String,
    },
    /// The account exists but has not been approved (403).
    PendingApproval,
    /// One or more fields failed validation (400).
    ValidationFailed {
        /// A summary of the failure.
        message: String,
        /// Every individual violation.
        details: Vec<String>,
    },
    /// A domain rule was violated (400).
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided (400).
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// Password policy violation (400).
    PasswordPolicyViolation {
        /// A human-readable description of the policy violation.
        message: String,
    },
    /// A requested resource was not found (404).
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred (500).
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::Forbidden { message } | Self::ValidationFailed { message, .. } => {
                write!(f, "{message}")
            }
            Self::PendingApproval => write!(f, "Account pending approval"),
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::PasswordPolicyViolation { message } => {
                write!(f, "Password policy violation: {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::AccountDeactivated => Self::Forbidden {
                message: String::from("Account is deactivated"),
            },
            AuthError::PendingApproval => Self::PendingApproval,
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidUnit(_)
        | DomainError::UnknownEquipment(_)
        | DomainError::UnknownParameter(_)
        | DomainError::NotesTooLong { .. } => ApiError::ValidationFailed {
            message: String::from("Validation failed"),
            details: vec![err.to_string()],
        },
        DomainError::InvalidDate { .. } | DomainError::DateArithmeticOverflow { .. } => {
            ApiError::InvalidInput {
                field: String::from("date"),
                message: err.to_string(),
            }
        }
        DomainError::InvalidRole(_) | DomainError::RoleNotAssignable(_) => ApiError::InvalidInput {
            field: String::from("role"),
            message: err.to_string(),
        },
        DomainError::InvalidEmail(_) => ApiError::InvalidInput {
            field: String::from("email"),
            message: err.to_string(),
        },
        DomainError::InvalidName(msg) => ApiError::InvalidInput {
            field: String::from("name"),
            message: msg,
        },
        DomainError::AlreadyApproved => ApiError::DomainRuleViolation {
            rule: String::from("approve_once"),
            message: err.to_string(),
        },
        DomainError::AccountDeactivated => ApiError::DomainRuleViolation {
            rule: String::from("approve_active_only"),
            message: err.to_string(),
        },
        DomainError::AccountPendingApproval => ApiError::PendingApproval,
        DomainError::SuperAdminProtected { .. } | DomainError::AdminElevationRequiresSuperAdmin => {
            ApiError::Forbidden {
                message: err.to_string(),
            }
        }
    }
}

/// Translates a persistence error into an API error.
///
/// Lookups that miss become 404s and duplicate emails become input errors.
/// Everything else is internal.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::DuplicateEmail(_) => ApiError::InvalidInput {
            field: String::from("email"),
            message: String::from("User with this email already exists"),
        },
        PersistenceError::UserNotFound(user_id) => ApiError::ResourceNotFound {
            resource_type: String::from("User"),
            message: format!("User {user_id} does not exist"),
        },
        PersistenceError::ReadingNotFound(reading_id) => ApiError::ResourceNotFound {
            resource_type: String::from("Reading"),
            message: format!("Reading '{reading_id}' does not exist"),
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
