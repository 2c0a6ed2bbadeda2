// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;
use time::Date;
use vibemon_domain::{AccountState, Role, Unit};

/// A stored user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserData {
    pub user_id: i64,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    pub is_approved: bool,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
    pub last_login_at: Option<String>,
    pub approved_at: Option<String>,
    pub approved_by: Option<i64>,
    pub deactivated_at: Option<String>,
    pub deactivated_by: Option<i64>,
    pub deactivation_reason: Option<String>,
    pub role_changed_at: Option<String>,
    pub role_changed_by: Option<i64>,
    pub password_reset_at: Option<String>,
    pub password_reset_by: Option<i64>,
    pub deleted_at: Option<String>,
    pub deleted_by: Option<i64>,
    pub original_email: Option<String>,
}

impl UserData {
    /// Returns the approval-relevant state of this account.
    #[must_use]
    pub const fn account_state(&self) -> AccountState {
        AccountState {
            role: self.role,
            is_approved: self.is_approved,
            is_active: self.is_active,
        }
    }
}

/// A stored bearer session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub user_id: i64,
    pub created_at: String,
    pub last_activity_at: String,
    pub expires_at: String,
}

/// Input for creating a user account.
#[derive(Debug, Clone, Copy)]
pub struct NewUser<'a> {
    /// Normalized (lowercased) email address.
    pub email: &'a str,
    pub name: &'a str,
    /// Plain-text password, hashed before storage.
    pub password: &'a str,
    pub role: Role,
    pub is_approved: bool,
}

/// Status filter for the admin user list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStatusFilter {
    /// `is_approved` is set.
    Approved,
    /// `is_approved` is clear.
    Pending,
    /// `is_active` is clear.
    Inactive,
}

impl FromStr for UserStatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(Self::Approved),
            "pending" => Ok(Self::Pending),
            "inactive" => Ok(Self::Inactive),
            other => Err(format!("Invalid status filter: {other}")),
        }
    }
}

/// Filters for the admin user list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserListFilter {
    pub role: Option<Role>,
    pub status: Option<UserStatusFilter>,
}

/// Filters for reading queries. All present filters must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadingFilter {
    pub unit: Option<Unit>,
    pub equipment: Option<String>,
    pub date: Option<Date>,
    /// Inclusive lower bound on the reading date.
    pub date_from: Option<Date>,
    /// Inclusive upper bound on the reading date.
    pub date_to: Option<Date>,
}

/// Filters for the audit log browser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditLogFilter {
    pub action: Option<String>,
    pub actor_id: Option<i64>,
    /// Inclusive lower bound on the entry's calendar day.
    pub date_from: Option<Date>,
    /// Inclusive upper bound on the entry's calendar day.
    pub date_to: Option<Date>,
}

/// A one-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    /// Largest page size a caller may request.
    pub const MAX_LIMIT: i64 = 1000;

    /// Creates a page request, clamping the page to at least 1 and the
    /// limit to `1..=MAX_LIMIT`.
    #[must_use]
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, Self::MAX_LIMIT),
        }
    }

    /// Number of rows to skip.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Number of pages needed for `total` rows.
    #[must_use]
    pub const fn pages(&self, total: i64) -> i64 {
        (total + self.limit - 1) / self.limit
    }
}

/// One page of results plus the total number of matching rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

/// Whether saving a reading created a new document or replaced one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Created,
    Updated,
}

/// A persisted audit log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditLogEntry {
    pub entry_id: i64,
    pub actor_id: Option<i64>,
    /// Current display name of the actor, if the actor still exists.
    pub actor_name: Option<String>,
    pub action: String,
    pub details: Value,
    pub ip: Option<String>,
    pub created_at: String,
}

/// Aggregate user counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserStats {
    pub total: i64,
    pub active: i64,
    pub approved: i64,
    /// Active accounts awaiting approval.
    pub pending: i64,
    pub by_role: BTreeMap<String, i64>,
}

/// Aggregate reading counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadingStats {
    pub total: i64,
    /// Readings dated today.
    pub today: i64,
    /// Number of distinct reading dates.
    pub unique_dates: i64,
}
