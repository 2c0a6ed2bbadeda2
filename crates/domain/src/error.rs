// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::account::Role;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Unit identifier is not one of the monitored units.
    InvalidUnit(String),
    /// Equipment identifier is not in the equipment catalog.
    UnknownEquipment(String),
    /// Parameter identifier is not in the parameter catalog.
    UnknownParameter(String),
    /// Failed to parse a calendar date.
    InvalidDate {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// Notes exceed the maximum length.
    NotesTooLong {
        /// The maximum allowed length in characters.
        max: usize,
    },
    /// Role name is not recognized.
    InvalidRole(String),
    /// Email address is malformed.
    InvalidEmail(String),
    /// Display name is empty or out of bounds.
    InvalidName(String),
    /// The account is already approved.
    AlreadyApproved,
    /// The account has been deactivated.
    AccountDeactivated,
    /// The account is still waiting for approval.
    AccountPendingApproval,
    /// The operation would modify a super admin account.
    SuperAdminProtected {
        /// The operation that was attempted.
        operation: String,
    },
    /// The role cannot be assigned through role changes.
    RoleNotAssignable(Role),
    /// Only a super admin may grant the admin role.
    AdminElevationRequiresSuperAdmin,
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUnit(unit) => write!(f, "Invalid unit: {unit}"),
            Self::UnknownEquipment(equipment) => write!(f, "Unknown equipment: {equipment}"),
            Self::UnknownParameter(parameter) => write!(f, "Unknown parameter: {parameter}"),
            Self::InvalidDate { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::NotesTooLong { max } => {
                write!(f, "Notes must not exceed {max} characters")
            }
            Self::InvalidRole(role) => write!(f, "Invalid role: {role}"),
            Self::InvalidEmail(email) => write!(f, "Invalid email address: {email}"),
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::AlreadyApproved => write!(f, "User is already approved"),
            Self::AccountDeactivated => write!(f, "User account is deactivated"),
            Self::AccountPendingApproval => {
                write!(f, "User account has not been approved yet")
            }
            Self::SuperAdminProtected { operation } => {
                write!(f, "Cannot {operation} a super admin account")
            }
            Self::RoleNotAssignable(role) => {
                write!(f, "Role '{role}' cannot be assigned")
            }
            Self::AdminElevationRequiresSuperAdmin => {
                write!(f, "Only a super admin may grant the admin role")
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
