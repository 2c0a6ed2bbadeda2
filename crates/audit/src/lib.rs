// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use serde::Serialize;
use serde_json::Value;
use std::str::FromStr;
use vibemon_domain::Role;

/// Represents the entity performing an action.
///
/// Most actors are authenticated users. Failed logins and other events
/// without an authenticated principal are recorded against the system actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Actor {
    /// The user id, or `None` for the system actor.
    pub id: Option<i64>,
    /// Display name at the time of the action.
    pub name: String,
    /// Role at the time of the action.
    pub role: Option<Role>,
}

impl Actor {
    /// Creates an actor for an authenticated user.
    ///
    /// # Arguments
    ///
    /// * `id` - The user's id
    /// * `name` - The user's display name
    /// * `role` - The user's current role
    #[must_use]
    pub const fn user(id: i64, name: String, role: Role) -> Self {
        Self {
            id: Some(id),
            name,
            role: Some(role),
        }
    }

    /// Creates the system actor.
    #[must_use]
    pub fn system() -> Self {
        Self {
            id: None,
            name: String::from("system"),
            role: None,
        }
    }
}

/// Operations that can be applied to several users at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkOperation {
    Approve,
    Deactivate,
    ChangeRole,
}

impl BulkOperation {
    /// Returns the wire name of this operation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Deactivate => "deactivate",
            Self::ChangeRole => "changeRole",
        }
    }
}

impl FromStr for BulkOperation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(Self::Approve),
            "deactivate" => Ok(Self::Deactivate),
            "changeRole" => Ok(Self::ChangeRole),
            other => Err(format!("Invalid bulk action: {other}")),
        }
    }
}

/// The kind of event recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditAction {
    UserRegistered,
    LoginSuccess,
    LoginFailed,
    Logout,
    ProfileUpdated,
    PasswordChanged,
    DataAccessed,
    DataCreated,
    DataUpdated,
    DataDeleted,
    DataAnalysisRequested,
    UserApproved,
    UserDeactivated,
    UserRoleChanged,
    PasswordResetByAdmin,
    BulkApprove,
    BulkDeactivate,
    BulkChangeRole,
    UnauthorizedAccessAttempt,
    UserDataExported,
    UserAccountDeleted,
}

impl AuditAction {
    /// Every action, in declaration order.
    pub const ALL: [Self; 21] = [
        Self::UserRegistered,
        Self::LoginSuccess,
        Self::LoginFailed,
        Self::Logout,
        Self::ProfileUpdated,
        Self::PasswordChanged,
        Self::DataAccessed,
        Self::DataCreated,
        Self::DataUpdated,
        Self::DataDeleted,
        Self::DataAnalysisRequested,
        Self::UserApproved,
        Self::UserDeactivated,
        Self::UserRoleChanged,
        Self::PasswordResetByAdmin,
        Self::BulkApprove,
        Self::BulkDeactivate,
        Self::BulkChangeRole,
        Self::UnauthorizedAccessAttempt,
        Self::UserDataExported,
        Self::UserAccountDeleted,
    ];

    /// Returns the stored name of this action.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UserRegistered => "USER_REGISTERED",
            Self::LoginSuccess => "LOGIN_SUCCESS",
            Self::LoginFailed => "LOGIN_FAILED",
            Self::Logout => "LOGOUT",
            Self::ProfileUpdated => "PROFILE_UPDATED",
            Self::PasswordChanged => "PASSWORD_CHANGED",
            Self::DataAccessed => "DATA_ACCESSED",
            Self::DataCreated => "DATA_CREATED",
            Self::DataUpdated => "DATA_UPDATED",
            Self::DataDeleted => "DATA_DELETED",
            Self::DataAnalysisRequested => "DATA_ANALYSIS_REQUESTED",
            Self::UserApproved => "USER_APPROVED",
            Self::UserDeactivated => "USER_DEACTIVATED",
            Self::UserRoleChanged => "USER_ROLE_CHANGED",
            Self::PasswordResetByAdmin => "PASSWORD_RESET_BY_ADMIN",
            Self::BulkApprove => "BULK_APPROVE",
            Self::BulkDeactivate => "BULK_DEACTIVATE",
            Self::BulkChangeRole => "BULK_CHANGEROLE",
            Self::UnauthorizedAccessAttempt => "UNAUTHORIZED_ACCESS_ATTEMPT",
            Self::UserDataExported => "USER_DATA_EXPORTED",
            Self::UserAccountDeleted => "USER_ACCOUNT_DELETED",
        }
    }

    /// Returns the action recorded for each success of a bulk operation.
    #[must_use]
    pub const fn for_bulk(operation: BulkOperation) -> Self {
        match operation {
            BulkOperation::Approve => Self::BulkApprove,
            BulkOperation::Deactivate => Self::BulkDeactivate,
            BulkOperation::ChangeRole => Self::BulkChangeRole,
        }
    }
}

impl FromStr for AuditAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| format!("Unknown audit action: {s}"))
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An audit event ready to be appended to the log.
///
/// Events are immutable once created. The timestamp is assigned when the
/// event is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEvent {
    /// Who performed the action.
    pub actor: Actor,
    /// What happened.
    pub action: AuditAction,
    /// Free-form structured details.
    pub details: Value,
    /// Client address the request came from, if known.
    pub ip: Option<String>,
}

impl AuditEvent {
    /// Creates a new `AuditEvent`.
    ///
    /// # Arguments
    ///
    /// * `actor` - The actor who initiated the change
    /// * `action` - The action that was performed
    /// * `details` - Structured details about the action
    /// * `ip` - The client address, if known
    #[must_use]
    pub const fn new(actor: Actor, action: AuditAction, details: Value, ip: Option<String>) -> Self {
        Self {
            actor,
            action,
            details,
            ip,
        }
    }
}
