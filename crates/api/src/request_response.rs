// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Field names on the wire are camelCase. Query-string DTOs keep every
//! field as a raw string so numeric parameters can be parsed leniently.

use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;
use time::Date;
use vibemon_audit::AuditAction;
use vibemon_domain::{
    AccountStatus, AnalysisParams, Anomaly, DEFAULT_COMPARISON_OFFSET, DEFAULT_TIME_RANGE_DAYS,
    Equipment, Parameter, RawParameterValue, Reading, ReadingSubmission, Role, Unit, UnitInfo,
    parse_date,
};
use vibemon_persistence::{
    AuditLogEntry, AuditLogFilter, Pagination, ReadingFilter, UserData, UserListFilter,
    UserStatusFilter,
};

use crate::error::{ApiError, translate_domain_error};

/// Default page size for the readings list.
pub const DEFAULT_READINGS_PAGE_SIZE: i64 = 50;

/// Default page size for the admin user list.
pub const DEFAULT_USERS_PAGE_SIZE: i64 = 10;

/// Default page size for the audit log browser.
pub const DEFAULT_AUDIT_PAGE_SIZE: i64 = 20;

/// Parses the leading integer of `raw`, ignoring leading whitespace and
/// any trailing garbage. Returns `None` when no digits lead the string.
pub(crate) fn parse_int_prefix(raw: &str) -> Option<i64> {
    let trimmed: &str = raw.trim_start();
    let (negative, digits): (bool, &str) = if let Some(rest) = trimmed.strip_prefix('-') {
        (true, rest)
    } else {
        (false, trimmed.strip_prefix('+').unwrap_or(trimmed))
    };
    let end: usize = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value: i64 = digits.get(..end)?.parse::<i64>().ok()?;
    Some(if negative { -value } else { value })
}

/// Parses the longest leading decimal number of `raw`. Returns `NaN` when
/// nothing numeric leads the string.
pub(crate) fn parse_float_prefix(raw: &str) -> f64 {
    let trimmed: &str = raw.trim_start();
    let candidate_len: usize = trimmed
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')))
        .unwrap_or(trimmed.len());
    (1..=candidate_len)
        .rev()
        .find_map(|len| trimmed.get(..len).and_then(|s| s.parse::<f64>().ok()))
        .unwrap_or(f64::NAN)
}

fn pagination_from(page: Option<&str>, limit: Option<&str>, default_limit: i64) -> Pagination {
    Pagination::new(
        page.and_then(parse_int_prefix).unwrap_or(1),
        limit.and_then(parse_int_prefix).unwrap_or(default_limit),
    )
}

fn optional_date(value: Option<&str>) -> Result<Option<Date>, ApiError> {
    value
        .filter(|v| !v.is_empty())
        .map(parse_date)
        .transpose()
        .map_err(translate_domain_error)
}

fn optional_role(value: Option<&str>) -> Result<Option<Role>, ApiError> {
    value
        .filter(|v| !v.is_empty())
        .map(Role::from_str)
        .transpose()
        .map_err(translate_domain_error)
}

// ============================================================================
// Authentication
// ============================================================================

/// API request to register a new account.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    /// Requested role. Defaults to operator.
    #[serde(default)]
    pub role: Option<String>,
}

/// API request to log in.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// API request to update the caller's profile.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: String,
}

/// API request to change the caller's password.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// A user as shown to the user themselves.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub is_approved: bool,
    pub is_active: bool,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

impl From<&UserData> for UserProfile {
    fn from(user: &UserData) -> Self {
        Self {
            id: user.user_id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            is_approved: user.is_approved,
            is_active: user.is_active,
            created_at: user.created_at.clone(),
            last_login_at: user.last_login_at.clone(),
        }
    }
}

/// API response for a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserProfile,
}

/// API response for a successful login.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    /// Bearer token for subsequent requests.
    pub token: String,
    pub user: UserProfile,
}

/// API response carrying the caller's profile.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user: UserProfile,
}

/// Generic acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    #[must_use]
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

// ============================================================================
// Readings
// ============================================================================

/// API request to save a reading.
///
/// Every field is optional at this layer so that all missing or malformed
/// fields are reported together by validation.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveReadingRequest {
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub equipment: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub parameters: Option<Value>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl SaveReadingRequest {
    /// Converts the request into a domain submission.
    ///
    /// A `parameters` value that is not a JSON object is dropped so that
    /// validation reports it.
    #[must_use]
    pub fn into_submission(self) -> ReadingSubmission {
        let parameters: Option<BTreeMap<String, RawParameterValue>> = match self.parameters {
            Some(Value::Object(map)) => Some(
                map.into_iter()
                    .map(|(id, value)| {
                        let raw: RawParameterValue = serde_json::from_value(value)
                            .unwrap_or(RawParameterValue::Other(serde::de::IgnoredAny));
                        (id, raw)
                    })
                    .collect(),
            ),
            _ => None,
        };

        ReadingSubmission {
            unit: self.unit,
            equipment: self.equipment,
            date: self.date,
            parameters,
            notes: self.notes,
        }
    }
}

/// API response for a saved reading.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveReadingResponse {
    pub message: String,
    /// Document id of the saved reading.
    pub id: String,
    pub unit: Unit,
    pub equipment: String,
    pub date: String,
    pub timestamp: String,
}

/// Query parameters for listing readings.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingListQuery {
    pub unit: Option<String>,
    pub equipment: Option<String>,
    pub date: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ReadingListQuery {
    /// Builds the storage filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the unit or a date is malformed.
    pub fn filter(&self) -> Result<ReadingFilter, ApiError> {
        let unit: Option<Unit> = self
            .unit
            .as_deref()
            .filter(|v| !v.is_empty())
            .map(Unit::from_str)
            .transpose()
            .map_err(translate_domain_error)?;

        Ok(ReadingFilter {
            unit,
            equipment: self.equipment.clone().filter(|v| !v.is_empty()),
            date: optional_date(self.date.as_deref())?,
            date_from: optional_date(self.date_from.as_deref())?,
            date_to: optional_date(self.date_to.as_deref())?,
        })
    }

    #[must_use]
    pub fn pagination(&self) -> Pagination {
        pagination_from(
            self.page.as_deref(),
            self.limit.as_deref(),
            DEFAULT_READINGS_PAGE_SIZE,
        )
    }
}

/// A stored reading together with its document id.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingInfo {
    pub id: String,
    #[serde(flatten)]
    pub reading: Reading,
}

impl From<Reading> for ReadingInfo {
    fn from(reading: Reading) -> Self {
        Self {
            id: reading.document_id(),
            reading,
        }
    }
}

/// Pagination metadata returned alongside a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl PaginationInfo {
    #[must_use]
    pub const fn new(pagination: Pagination, total: i64) -> Self {
        Self {
            page: pagination.page,
            limit: pagination.limit,
            total,
            pages: pagination.pages(total),
        }
    }
}

/// API response for a page of readings.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingListResponse {
    pub data: Vec<ReadingInfo>,
    pub pagination: PaginationInfo,
}

/// Query parameters for anomaly analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisQuery {
    pub threshold: Option<String>,
    pub time_range: Option<String>,
    pub comparison_days: Option<String>,
}

impl AnalysisQuery {
    /// Resolves the analysis parameters.
    ///
    /// A non-numeric threshold becomes `NaN`. Non-numeric window or offset
    /// values fall back to their defaults.
    #[must_use]
    pub fn params(&self) -> AnalysisParams {
        let defaults: AnalysisParams = AnalysisParams::default();
        AnalysisParams {
            threshold: self
                .threshold
                .as_deref()
                .map_or(defaults.threshold, parse_float_prefix),
            time_range_days: self
                .time_range
                .as_deref()
                .and_then(parse_int_prefix)
                .unwrap_or(DEFAULT_TIME_RANGE_DAYS),
            comparison_offset: self
                .comparison_days
                .as_deref()
                .and_then(parse_int_prefix)
                .unwrap_or(DEFAULT_COMPARISON_OFFSET),
        }
    }
}

/// Summary of an analysis run.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    #[serde(flatten)]
    pub params: AnalysisParams,
    pub total_data_points: usize,
    pub anomalies_found: usize,
}

/// API response for an analysis run.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub anomalies: Vec<Anomaly>,
    pub analysis: AnalysisSummary,
}

/// API response listing the monitored units, equipment and parameters.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    pub units: Vec<UnitInfo>,
    pub equipment: Vec<Equipment>,
    pub parameters: Vec<Parameter>,
}

// ============================================================================
// User directory and self-service
// ============================================================================

/// Query parameters for the user directory search.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryQuery {
    pub query: Option<String>,
    pub role: Option<String>,
}

impl DirectoryQuery {
    /// Parses the role filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the role is not recognized.
    pub fn role(&self) -> Result<Option<Role>, ApiError> {
        optional_role(self.role.as_deref())
    }
}

/// A user as listed in the directory.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEntry {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&UserData> for DirectoryEntry {
    fn from(user: &UserData) -> Self {
        Self {
            id: user.user_id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// API response for the user directory.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryResponse {
    pub users: Vec<DirectoryEntry>,
    pub count: usize,
}

/// API request to delete (anonymize) an account.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAccountRequest {
    #[serde(default)]
    pub confirmation: Option<String>,
}

/// API response for a personal data export.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    pub exported_at: String,
    /// Id of the user who requested the export.
    pub exported_by: i64,
    pub user: UserRecord,
    pub vibrate_data: Vec<ReadingInfo>,
    pub audit_logs: Vec<AuditLogInfo>,
}

// ============================================================================
// Administration
// ============================================================================

/// A user as shown to administrators.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub status: AccountStatus,
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
}

impl From<&UserData> for UserRecord {
    fn from(user: &UserData) -> Self {
        Self {
            id: user.user_id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            status: user.account_state().status(),
            is_approved: user.is_approved,
            is_active: user.is_active,
            created_at: user.created_at.clone(),
            updated_at: user.updated_at.clone(),
            last_login_at: user.last_login_at.clone(),
            approved_at: user.approved_at.clone(),
            approved_by: user.approved_by,
            deactivated_at: user.deactivated_at.clone(),
            deactivated_by: user.deactivated_by,
            deactivation_reason: user.deactivation_reason.clone(),
            role_changed_at: user.role_changed_at.clone(),
            role_changed_by: user.role_changed_by,
            password_reset_at: user.password_reset_at.clone(),
            password_reset_by: user.password_reset_by,
            deleted_at: user.deleted_at.clone(),
        }
    }
}

/// Query parameters for the admin user list.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
}

impl AdminUserListQuery {
    /// Builds the storage filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the role or status is not recognized.
    pub fn filter(&self) -> Result<UserListFilter, ApiError> {
        let status: Option<UserStatusFilter> = self
            .status
            .as_deref()
            .filter(|v| !v.is_empty())
            .map(UserStatusFilter::from_str)
            .transpose()
            .map_err(|message| ApiError::InvalidInput {
                field: String::from("status"),
                message,
            })?;

        Ok(UserListFilter {
            role: optional_role(self.role.as_deref())?,
            status,
        })
    }

    #[must_use]
    pub fn pagination(&self) -> Pagination {
        pagination_from(
            self.page.as_deref(),
            self.limit.as_deref(),
            DEFAULT_USERS_PAGE_SIZE,
        )
    }
}

/// API response for a page of users.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListResponse {
    pub users: Vec<UserRecord>,
    pub pagination: PaginationInfo,
}

/// API response listing accounts awaiting approval.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingUsersResponse {
    pub users: Vec<UserRecord>,
    pub count: usize,
}

/// API response for a single user with their recent activity.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetailResponse {
    pub user: UserRecord,
    pub recent_activity: Vec<AuditLogInfo>,
}

/// API response for a single-user admin action.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserActionResponse {
    pub message: String,
    pub user: UserRecord,
}

/// API request to deactivate a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeactivateRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

/// API request to change a user's role.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRoleRequest {
    pub role: String,
}

/// API request to reset a user's password.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub new_password: String,
}

/// Extra data for a bulk operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkData {
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// API request to apply one operation to many users.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkRequest {
    pub user_ids: Vec<i64>,
    pub action: String,
    #[serde(default)]
    pub data: BulkData,
}

/// A user a bulk operation succeeded for.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkSuccess {
    pub user_id: i64,
    pub email: String,
    pub name: String,
}

/// A user a bulk operation failed for.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkFailure {
    pub user_id: i64,
    pub error: String,
}

/// Per-item outcome of a bulk operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkResults {
    pub success: Vec<BulkSuccess>,
    pub failed: Vec<BulkFailure>,
}

/// API response for a bulk operation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkResponse {
    pub message: String,
    pub results: BulkResults,
}

/// An audit log entry as shown to administrators.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogInfo {
    pub id: i64,
    pub user_id: Option<i64>,
    pub user_name: Option<String>,
    pub action: String,
    pub details: Value,
    pub ip: Option<String>,
    pub timestamp: String,
}

impl From<AuditLogEntry> for AuditLogInfo {
    fn from(entry: AuditLogEntry) -> Self {
        Self {
            id: entry.entry_id,
            user_id: entry.actor_id,
            user_name: entry.actor_name,
            action: entry.action,
            details: entry.details,
            ip: entry.ip,
            timestamp: entry.created_at,
        }
    }
}

/// Query parameters for the audit log browser.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub action: Option<String>,
    pub user_id: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

impl AuditLogQuery {
    /// Builds the storage filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the action, user id or a date is malformed.
    pub fn filter(&self) -> Result<AuditLogFilter, ApiError> {
        let action: Option<String> = self
            .action
            .as_deref()
            .filter(|v| !v.is_empty())
            .map(|v| {
                AuditAction::from_str(v)
                    .map(|a| a.as_str().to_string())
                    .map_err(|message| ApiError::InvalidInput {
                        field: String::from("action"),
                        message,
                    })
            })
            .transpose()?;

        let actor_id: Option<i64> = self
            .user_id
            .as_deref()
            .filter(|v| !v.is_empty())
            .map(|v| {
                v.trim().parse::<i64>().map_err(|_| ApiError::InvalidInput {
                    field: String::from("userId"),
                    message: format!("Invalid user id: {v}"),
                })
            })
            .transpose()?;

        Ok(AuditLogFilter {
            action,
            actor_id,
            date_from: optional_date(self.date_from.as_deref())?,
            date_to: optional_date(self.date_to.as_deref())?,
        })
    }

    #[must_use]
    pub fn pagination(&self) -> Pagination {
        pagination_from(
            self.page.as_deref(),
            self.limit.as_deref(),
            DEFAULT_AUDIT_PAGE_SIZE,
        )
    }
}

/// API response for a page of audit log entries.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogResponse {
    pub logs: Vec<AuditLogInfo>,
    pub pagination: PaginationInfo,
}

/// User counts for the stats dashboard.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatsInfo {
    pub total: i64,
    pub active: i64,
    pub approved: i64,
    pub pending: i64,
    pub by_role: BTreeMap<String, i64>,
}

/// Reading counts for the stats dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataStatsInfo {
    pub total_records: i64,
    pub today_records: i64,
    pub unique_dates: i64,
}

/// API response for the stats dashboard.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub users: UserStatsInfo,
    pub data: DataStatsInfo,
    pub recent_activity: Vec<AuditLogInfo>,
}

/// API response for the health check.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
}
