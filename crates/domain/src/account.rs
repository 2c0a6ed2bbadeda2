// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Roles and the account approval lifecycle.
//!
//! ```text
//! pending --approve--> approved --deactivate--> deactivated
//!    |                                              ^
//!    +------------------deactivate------------------+
//! ```
//!
//! A deactivated account cannot be approved again. Super admin accounts
//! never leave the approved state and never change role.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Operator,
    Technician,
    Engineer,
    Supervisor,
    Admin,
    SuperAdmin,
}

impl Role {
    /// All roles, lowest privilege first.
    pub const ALL: [Self; 6] = [
        Self::Operator,
        Self::Technician,
        Self::Engineer,
        Self::Supervisor,
        Self::Admin,
        Self::SuperAdmin,
    ];

    /// Returns the string representation of this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Operator => "operator",
            Self::Technician => "technician",
            Self::Engineer => "engineer",
            Self::Supervisor => "supervisor",
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
        }
    }

    /// Returns whether this role may use the admin endpoints.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin | Self::SuperAdmin)
    }

    /// Returns whether this role may delete readings.
    #[must_use]
    pub const fn can_delete_readings(&self) -> bool {
        matches!(self, Self::Supervisor | Self::Admin | Self::SuperAdmin)
    }

    /// Returns whether a new account may request this role at registration.
    #[must_use]
    pub const fn is_self_assignable(&self) -> bool {
        matches!(
            self,
            Self::Operator | Self::Technician | Self::Engineer | Self::Supervisor
        )
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| DomainError::InvalidRole(s.to_string()))
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The lifecycle status derived from an account's flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Pending,
    Approved,
    Deactivated,
}

impl AccountStatus {
    /// Returns the string representation of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Deactivated => "deactivated",
        }
    }
}

/// The approval-relevant state of an account.
///
/// Transitions return the new state and leave `self` untouched, so callers
/// can validate an operation before persisting anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountState {
    pub role: Role,
    pub is_approved: bool,
    pub is_active: bool,
}

impl AccountState {
    /// The state of a freshly registered account.
    #[must_use]
    pub const fn registered(role: Role) -> Self {
        Self {
            role,
            is_approved: false,
            is_active: true,
        }
    }

    #[must_use]
    pub const fn status(&self) -> AccountStatus {
        if !self.is_active {
            AccountStatus::Deactivated
        } else if self.is_approved {
            AccountStatus::Approved
        } else {
            AccountStatus::Pending
        }
    }

    /// Approves a pending account.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::AlreadyApproved`] for approved accounts and
    /// [`DomainError::AccountDeactivated`] for deactivated ones.
    pub const fn approve(&self) -> Result<Self, DomainError> {
        match self.status() {
            AccountStatus::Approved => Err(DomainError::AlreadyApproved),
            AccountStatus::Deactivated => Err(DomainError::AccountDeactivated),
            AccountStatus::Pending => Ok(Self {
                role: self.role,
                is_approved: true,
                is_active: true,
            }),
        }
    }

    /// Deactivates the account, clearing its approval.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::SuperAdminProtected`] for super admin accounts.
    pub fn deactivate(&self) -> Result<Self, DomainError> {
        if self.role == Role::SuperAdmin {
            return Err(DomainError::SuperAdminProtected {
                operation: String::from("deactivate"),
            });
        }
        Ok(Self {
            role: self.role,
            is_approved: false,
            is_active: false,
        })
    }

    /// Changes the account's role on behalf of `actor_role`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The account is a super admin
    /// - `new_role` is `super_admin`
    /// - `new_role` is `admin` and the actor is not a super admin
    pub fn change_role(&self, new_role: Role, actor_role: Role) -> Result<Self, DomainError> {
        if self.role == Role::SuperAdmin {
            return Err(DomainError::SuperAdminProtected {
                operation: String::from("change the role of"),
            });
        }
        if new_role == Role::SuperAdmin {
            return Err(DomainError::RoleNotAssignable(new_role));
        }
        if new_role == Role::Admin && actor_role != Role::SuperAdmin {
            return Err(DomainError::AdminElevationRequiresSuperAdmin);
        }
        Ok(Self {
            role: new_role,
            ..*self
        })
    }

    /// Checks that the account may authenticate.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::AccountDeactivated`] or
    /// [`DomainError::AccountPendingApproval`].
    pub const fn ensure_can_authenticate(&self) -> Result<(), DomainError> {
        match self.status() {
            AccountStatus::Approved => Ok(()),
            AccountStatus::Deactivated => Err(DomainError::AccountDeactivated),
            AccountStatus::Pending => Err(DomainError::AccountPendingApproval),
        }
    }
}
