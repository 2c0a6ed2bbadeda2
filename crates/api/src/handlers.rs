// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handlers.
//!
//! Each handler performs one API operation against the persistence layer:
//! authorization, validation, the state change, and the audit record.
//! Handlers are synchronous; the server serializes calls through a single
//! connection.
//!
//! Audit writes are best-effort. A failed audit write is logged and does
//! not fail the operation that triggered it.

use serde_json::{Value, json};
use std::str::FromStr;
use time::{Date, Duration};
use tracing::{error, info, warn};
use vibemon_audit::{Actor, AuditAction, AuditEvent, BulkOperation};
use vibemon_domain::{
    AnalysisParams, AnalysisWindow, Anomaly, DomainError, EQUIPMENT, NOTES_MAX_LEN, PARAMETERS,
    Reading, Role, UNITS, ValidatedReading, detect_anomalies, format_date, validate_email,
    validate_name, validate_reading_submission,
};
use vibemon_persistence::{
    AuditLogEntry, AuditLogFilter, NewUser, Page, Pagination, Persistence, ReadingFilter,
    ReadingStats, SaveOutcome, UserData, UserListFilter, UserStats, now_timestamp,
};

use crate::auth::{AuthenticatedUser, AuthenticationService, AuthorizationService};
use crate::error::{ApiError, AuthError, translate_domain_error, translate_persistence_error};
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    AdminUserListQuery, AnalysisQuery, AnalysisResponse, AnalysisSummary, AuditLogInfo,
    AuditLogQuery, AuditLogResponse, BulkFailure, BulkRequest, BulkResponse, BulkResults,
    BulkSuccess, CatalogResponse, ChangePasswordRequest, ChangeRoleRequest, DataStatsInfo,
    DeactivateRequest, DeleteAccountRequest, DirectoryEntry, DirectoryQuery, DirectoryResponse,
    ExportResponse, HealthResponse, LoginRequest, LoginResponse, MessageResponse, PaginationInfo,
    PendingUsersResponse, ProfileResponse, ReadingInfo, ReadingListQuery, ReadingListResponse,
    RegisterRequest, RegisterResponse, ResetPasswordRequest, SaveReadingRequest,
    SaveReadingResponse, StatsResponse, UpdateProfileRequest, UserActionResponse,
    UserDetailResponse, UserListResponse, UserProfile, UserRecord, UserStatsInfo,
};

/// Roles allowed to use the administration endpoints.
const ADMIN_ROLES: [Role; 2] = [Role::Admin, Role::SuperAdmin];

/// Roles allowed to reset another user's password.
const SUPER_ADMIN_ONLY: [Role; 1] = [Role::SuperAdmin];

/// Confirmation string required to delete an account.
pub const DELETE_CONFIRMATION: &str = "DELETE_PERMANENTLY";

/// Reason recorded when a deactivation gives none.
const DEFAULT_DEACTIVATION_REASON: &str = "No reason provided";

/// Number of audit entries shown on the user detail and stats views.
const RECENT_ACTIVITY_LIMIT: i64 = 10;

/// Maximum number of audit entries included in a data export.
const EXPORT_AUDIT_LIMIT: i64 = 1000;

// ============================================================================
// Shared helpers
// ============================================================================

/// Appends an audit event, logging instead of failing on error.
fn record_audit(
    persistence: &mut Persistence,
    actor: Actor,
    action: AuditAction,
    details: Value,
    ip: Option<&str>,
) {
    let event: AuditEvent = AuditEvent::new(actor, action, details, ip.map(str::to_string));
    if let Err(e) = persistence.persist_audit_event(&event) {
        error!(action = action.as_str(), error = %e, "Failed to persist audit event");
    }
}

/// Records a refused request and builds the error returned for it.
fn deny_access(
    persistence: &mut Persistence,
    user: &AuthenticatedUser,
    action: &str,
    required: &str,
    endpoint: &str,
    ip: Option<&str>,
) -> ApiError {
    warn!(
        user_id = user.id,
        role = user.role.as_str(),
        endpoint,
        "Unauthorized access attempt"
    );
    record_audit(
        persistence,
        user.to_audit_actor(),
        AuditAction::UnauthorizedAccessAttempt,
        json!({
            "requiredRoles": required,
            "userRole": user.role.as_str(),
            "endpoint": endpoint,
        }),
        ip,
    );
    ApiError::Unauthorized {
        action: action.to_string(),
        required_role: required.to_string(),
    }
}

/// Requires one of `allowed`, auditing the attempt when it fails.
fn enforce_roles(
    persistence: &mut Persistence,
    user: &AuthenticatedUser,
    allowed: &[Role],
    action: &str,
    endpoint: &str,
    ip: Option<&str>,
) -> Result<(), ApiError> {
    match AuthorizationService::require_role(user, allowed, action) {
        Ok(()) => Ok(()),
        Err(AuthError::Unauthorized { required_role, .. }) => Err(deny_access(
            persistence,
            user,
            action,
            &required_role,
            endpoint,
            ip,
        )),
        Err(other) => Err(other.into()),
    }
}

/// Loads a user or fails with a 404.
fn load_user(persistence: &mut Persistence, user_id: i64) -> Result<UserData, ApiError> {
    persistence
        .get_user_by_id(user_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("User"),
            message: format!("User {user_id} does not exist"),
        })
}

fn entries_to_info(entries: Vec<AuditLogEntry>) -> Vec<AuditLogInfo> {
    entries.into_iter().map(AuditLogInfo::from).collect()
}

// ============================================================================
// Health
// ============================================================================

/// Reports service liveness.
#[must_use]
pub fn health(version: &str) -> HealthResponse {
    HealthResponse {
        status: String::from("OK"),
        timestamp: now_timestamp(),
        version: version.to_string(),
    }
}

// ============================================================================
// Bootstrap
// ============================================================================

/// Ensures the bootstrap super admin account exists.
///
/// The account is created approved and active when no user holds `email`.
/// An existing account is left untouched.
///
/// # Returns
///
/// `true` if the account was created.
///
/// # Errors
///
/// Returns an error if the email is malformed, the password violates the
/// policy, or the database fails.
pub fn ensure_super_admin(
    persistence: &mut Persistence,
    email: &str,
    password: &str,
) -> Result<bool, ApiError> {
    let email: String = validate_email(email).map_err(translate_domain_error)?;

    if let Some(existing) = persistence
        .get_user_by_email(&email)
        .map_err(translate_persistence_error)?
    {
        if existing.role != Role::SuperAdmin {
            warn!(
                user_id = existing.user_id,
                "Bootstrap super admin email belongs to a non-super-admin account"
            );
        }
        return Ok(false);
    }

    PasswordPolicy::default().validate(password)?;

    let user_id: i64 = persistence
        .create_user(NewUser {
            email: &email,
            name: "Super Administrator",
            password,
            role: Role::SuperAdmin,
            is_approved: true,
        })
        .map_err(translate_persistence_error)?;

    record_audit(
        persistence,
        Actor::system(),
        AuditAction::UserRegistered,
        json!({
            "userId": user_id,
            "email": email,
            "role": Role::SuperAdmin.as_str(),
            "bootstrap": true,
        }),
        None,
    );

    info!(user_id, "Super admin account created");
    Ok(true)
}

// ============================================================================
// Authentication
// ============================================================================

/// Registers a new, pending account.
///
/// Every invalid field is reported together.
///
/// # Errors
///
/// Returns an error if:
/// - Any field fails validation
/// - The requested role may not be self-assigned
/// - The email is already registered
pub fn register(
    persistence: &mut Persistence,
    request: &RegisterRequest,
    ip: Option<&str>,
) -> Result<RegisterResponse, ApiError> {
    let mut details: Vec<String> = Vec::new();

    let email: Option<String> = validate_email(&request.email)
        .map_err(|e| details.push(e.to_string()))
        .ok();
    let name: Option<String> = validate_name(&request.name)
        .map_err(|e| details.push(e.to_string()))
        .ok();
    if let Err(e) = PasswordPolicy::default().validate(&request.password) {
        details.push(e.to_string());
    }

    let role: Option<Role> = match request.role.as_deref().filter(|r| !r.is_empty()) {
        None => Some(Role::Operator),
        Some(raw) => match Role::from_str(raw) {
            Ok(role) if role.is_self_assignable() => Some(role),
            Ok(role) => {
                details.push(format!("Role '{role}' cannot be requested at registration"));
                None
            }
            Err(e) => {
                details.push(e.to_string());
                None
            }
        },
    };

    let (Some(email), Some(name), Some(role)) = (email, name, role) else {
        return Err(ApiError::ValidationFailed {
            message: String::from("Validation failed"),
            details,
        });
    };
    if !details.is_empty() {
        return Err(ApiError::ValidationFailed {
            message: String::from("Validation failed"),
            details,
        });
    }

    let user_id: i64 = persistence
        .create_user(NewUser {
            email: &email,
            name: &name,
            password: &request.password,
            role,
            is_approved: false,
        })
        .map_err(translate_persistence_error)?;

    let user: UserData = load_user(persistence, user_id)?;

    record_audit(
        persistence,
        Actor::user(user_id, user.name.clone(), role),
        AuditAction::UserRegistered,
        json!({ "email": email, "role": role.as_str() }),
        ip,
    );

    Ok(RegisterResponse {
        message: String::from("Registration successful. Your account is pending admin approval."),
        user: UserProfile::from(&user),
    })
}

/// Logs a user in and issues a bearer token.
///
/// # Errors
///
/// Returns a 401 for bad credentials and a 403 for deactivated or
/// unapproved accounts. Every failure is audited.
pub fn login(
    persistence: &mut Persistence,
    request: &LoginRequest,
    session_lifetime: Duration,
    ip: Option<&str>,
) -> Result<LoginResponse, ApiError> {
    let (token, user) = match AuthenticationService::login(
        persistence,
        &request.email,
        &request.password,
        session_lifetime,
    ) {
        Ok(result) => result,
        Err(e) => {
            warn!(email = %request.email, error = %e, "Login failed");
            record_audit(
                persistence,
                Actor::system(),
                AuditAction::LoginFailed,
                json!({ "email": request.email.trim().to_lowercase(), "reason": e.to_string() }),
                ip,
            );
            return Err(e);
        }
    };

    let user: UserData = load_user(persistence, user.user_id)?;

    record_audit(
        persistence,
        Actor::user(user.user_id, user.name.clone(), user.role),
        AuditAction::LoginSuccess,
        json!({ "email": user.email }),
        ip,
    );

    Ok(LoginResponse {
        message: String::from("Login successful"),
        token,
        user: UserProfile::from(&user),
    })
}

/// Ends the caller's session.
///
/// # Errors
///
/// Returns an error if the session cannot be deleted.
pub fn logout(
    persistence: &mut Persistence,
    session_token: &str,
    user: &AuthenticatedUser,
    ip: Option<&str>,
) -> Result<MessageResponse, ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    record_audit(
        persistence,
        user.to_audit_actor(),
        AuditAction::Logout,
        json!({}),
        ip,
    );
    Ok(MessageResponse::new("Logged out successfully"))
}

/// Returns the caller's profile.
///
/// # Errors
///
/// Returns an error if the user cannot be loaded.
pub fn get_profile(
    persistence: &mut Persistence,
    user: &AuthenticatedUser,
) -> Result<ProfileResponse, ApiError> {
    let data: UserData = load_user(persistence, user.id)?;
    Ok(ProfileResponse {
        user: UserProfile::from(&data),
    })
}

/// Updates the caller's display name.
///
/// # Errors
///
/// Returns an error if the name is invalid or the update fails.
pub fn update_profile(
    persistence: &mut Persistence,
    request: &UpdateProfileRequest,
    user: &AuthenticatedUser,
    ip: Option<&str>,
) -> Result<ProfileResponse, ApiError> {
    let name: String = validate_name(&request.name).map_err(translate_domain_error)?;

    persistence
        .update_profile_name(user.id, &name)
        .map_err(translate_persistence_error)?;

    record_audit(
        persistence,
        user.to_audit_actor(),
        AuditAction::ProfileUpdated,
        json!({ "oldName": user.name, "newName": name }),
        ip,
    );

    get_profile(persistence, user)
}

/// Changes the caller's password after verifying the current one.
///
/// # Errors
///
/// Returns an error if the current password is wrong, the new password
/// violates the policy, or the update fails.
pub fn change_password(
    persistence: &mut Persistence,
    request: &ChangePasswordRequest,
    user: &AuthenticatedUser,
    ip: Option<&str>,
) -> Result<MessageResponse, ApiError> {
    let data: UserData = load_user(persistence, user.id)?;

    let password_valid: bool =
        Persistence::verify_password(&request.current_password, &data.password_hash)
            .map_err(translate_persistence_error)?;
    if !password_valid {
        return Err(ApiError::InvalidInput {
            field: String::from("currentPassword"),
            message: String::from("Current password is incorrect"),
        });
    }

    PasswordPolicy::default().validate(&request.new_password)?;

    persistence
        .update_password(user.id, &request.new_password)
        .map_err(translate_persistence_error)?;

    record_audit(
        persistence,
        user.to_audit_actor(),
        AuditAction::PasswordChanged,
        json!({}),
        ip,
    );

    Ok(MessageResponse::new("Password changed successfully"))
}

// ============================================================================
// Readings
// ============================================================================

/// Lists readings matching the query, newest first.
///
/// # Errors
///
/// Returns an error if a filter is malformed or the query fails.
pub fn list_readings(
    persistence: &mut Persistence,
    query: &ReadingListQuery,
    user: &AuthenticatedUser,
    ip: Option<&str>,
) -> Result<ReadingListResponse, ApiError> {
    let filter: ReadingFilter = query.filter()?;
    let pagination: Pagination = query.pagination();

    let page: Page<Reading> = persistence
        .list_readings(&filter, pagination)
        .map_err(translate_persistence_error)?;

    record_audit(
        persistence,
        user.to_audit_actor(),
        AuditAction::DataAccessed,
        json!({
            "filters": {
                "unit": query.unit,
                "equipment": query.equipment,
                "date": query.date,
                "dateFrom": query.date_from,
                "dateTo": query.date_to,
            },
            "resultCount": page.items.len(),
            "page": pagination.page,
        }),
        ip,
    );

    Ok(ReadingListResponse {
        data: page.items.into_iter().map(ReadingInfo::from).collect(),
        pagination: PaginationInfo::new(pagination, page.total),
    })
}

/// Saves a reading, replacing any reading with the same unit, equipment
/// and date.
///
/// # Returns
///
/// Whether the reading was created or replaced, and the response body.
///
/// # Errors
///
/// Returns a validation error listing every violation, or an error if the
/// write fails.
pub fn save_reading(
    persistence: &mut Persistence,
    request: SaveReadingRequest,
    user: &AuthenticatedUser,
    ip: Option<&str>,
) -> Result<(SaveOutcome, SaveReadingResponse), ApiError> {
    let validated: ValidatedReading =
        validate_reading_submission(&request.into_submission()).map_err(|details| {
            ApiError::ValidationFailed {
                message: String::from("Validation failed"),
                details,
            }
        })?;

    let reading: Reading = Reading {
        unit: validated.unit,
        equipment: validated.equipment.id.to_string(),
        date: validated.date,
        parameters: validated.parameters,
        notes: validated.notes,
        created_by: user.id,
        created_by_name: user.name.clone(),
        recorded_at: now_timestamp(),
    };
    let reading_id: String = reading.document_id();

    let outcome: SaveOutcome = persistence
        .save_reading(&reading)
        .map_err(translate_persistence_error)?;

    let (action, message): (AuditAction, &str) = match outcome {
        SaveOutcome::Created => (AuditAction::DataCreated, "Data saved successfully"),
        SaveOutcome::Updated => (AuditAction::DataUpdated, "Data updated successfully"),
    };
    record_audit(
        persistence,
        user.to_audit_actor(),
        action,
        json!({
            "dataId": reading_id,
            "unit": reading.unit.as_str(),
            "equipment": reading.equipment,
            "date": format_date(reading.date),
            "parameterCount": reading.parameters.len(),
        }),
        ip,
    );

    Ok((
        outcome,
        SaveReadingResponse {
            message: message.to_string(),
            id: reading_id,
            unit: reading.unit,
            equipment: reading.equipment,
            date: format_date(reading.date),
            timestamp: reading.recorded_at,
        },
    ))
}

/// Deletes a reading.
///
/// # Errors
///
/// Returns an error if the caller may not delete readings, the reading
/// does not exist, or the delete fails.
pub fn delete_reading(
    persistence: &mut Persistence,
    reading_id: &str,
    user: &AuthenticatedUser,
    ip: Option<&str>,
) -> Result<MessageResponse, ApiError> {
    let allowed: Vec<Role> = Role::ALL
        .into_iter()
        .filter(Role::can_delete_readings)
        .collect();
    enforce_roles(
        persistence,
        user,
        &allowed,
        "delete reading",
        "DELETE /api/data/:id",
        ip,
    )?;

    let deleted: Reading = persistence
        .delete_reading(reading_id)
        .map_err(translate_persistence_error)?;

    record_audit(
        persistence,
        user.to_audit_actor(),
        AuditAction::DataDeleted,
        json!({ "dataId": reading_id, "deletedData": deleted }),
        ip,
    );

    Ok(MessageResponse::new("Data deleted successfully"))
}

/// Runs anomaly detection over the readings of the requested window.
///
/// # Arguments
///
/// * `today` - The last day of the analysis window
///
/// # Errors
///
/// Returns an error if the window cannot be computed or the query fails.
pub fn analyze_readings(
    persistence: &mut Persistence,
    query: &AnalysisQuery,
    today: Date,
    user: &AuthenticatedUser,
    ip: Option<&str>,
) -> Result<AnalysisResponse, ApiError> {
    let params: AnalysisParams = query.params();
    let window: AnalysisWindow = AnalysisWindow::ending(today, params.time_range_days)
        .map_err(|e| ApiError::InvalidInput {
            field: String::from("timeRange"),
            message: e.to_string(),
        })?;

    let readings: Vec<Reading> = persistence
        .readings_in_window(window.start, window.end)
        .map_err(translate_persistence_error)?;
    let anomalies: Vec<Anomaly> = detect_anomalies(&readings, &params);

    info!(
        readings = readings.len(),
        anomalies = anomalies.len(),
        "Analysis completed"
    );

    record_audit(
        persistence,
        user.to_audit_actor(),
        AuditAction::DataAnalysisRequested,
        json!({
            "threshold": params.threshold,
            "timeRange": params.time_range_days,
            "comparisonDays": params.comparison_offset,
            "anomaliesFound": anomalies.len(),
        }),
        ip,
    );

    Ok(AnalysisResponse {
        analysis: AnalysisSummary {
            params,
            total_data_points: readings.len(),
            anomalies_found: anomalies.len(),
        },
        anomalies,
    })
}

/// Returns the unit, equipment and parameter catalogs.
#[must_use]
pub fn get_catalog() -> CatalogResponse {
    CatalogResponse {
        units: UNITS.to_vec(),
        equipment: EQUIPMENT.to_vec(),
        parameters: PARAMETERS.to_vec(),
    }
}

// ============================================================================
// User directory and self-service
// ============================================================================

fn directory_response(users: &[UserData]) -> DirectoryResponse {
    let users: Vec<DirectoryEntry> = users.iter().map(DirectoryEntry::from).collect();
    DirectoryResponse {
        count: users.len(),
        users,
    }
}

/// Lists every approved, active user.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_directory(persistence: &mut Persistence) -> Result<DirectoryResponse, ApiError> {
    let users: Vec<UserData> = persistence
        .list_directory(None, None)
        .map_err(translate_persistence_error)?;
    Ok(directory_response(&users))
}

/// Searches approved, active users by name or email and optional role.
///
/// # Errors
///
/// Returns an error if the role is not recognized or the query fails.
pub fn search_directory(
    persistence: &mut Persistence,
    query: &DirectoryQuery,
) -> Result<DirectoryResponse, ApiError> {
    let role: Option<Role> = query.role()?;
    let search: Option<&str> = query
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty());

    let users: Vec<UserData> = persistence
        .list_directory(search, role)
        .map_err(translate_persistence_error)?;
    Ok(directory_response(&users))
}

/// Exports a user's account, readings and audit history.
///
/// Users may export their own data; administrators may export anyone's.
///
/// # Errors
///
/// Returns an error if the caller is not allowed, the user does not exist,
/// or a query fails.
pub fn export_user_data(
    persistence: &mut Persistence,
    target_id: i64,
    user: &AuthenticatedUser,
    ip: Option<&str>,
) -> Result<ExportResponse, ApiError> {
    if user.id != target_id && !user.role.is_admin() {
        return Err(deny_access(
            persistence,
            user,
            "export user data",
            "self, admin or super_admin",
            "GET /api/users/:id/export",
            ip,
        ));
    }

    let target: UserData = load_user(persistence, target_id)?;
    let readings: Vec<Reading> = persistence
        .readings_by_creator(target_id)
        .map_err(translate_persistence_error)?;
    let entries: Vec<AuditLogEntry> = persistence
        .audit_entries_for_actor(target_id, EXPORT_AUDIT_LIMIT)
        .map_err(translate_persistence_error)?;

    record_audit(
        persistence,
        user.to_audit_actor(),
        AuditAction::UserDataExported,
        json!({
            "targetUserId": target_id,
            "recordCount": readings.len(),
            "auditLogCount": entries.len(),
        }),
        ip,
    );

    Ok(ExportResponse {
        exported_at: now_timestamp(),
        exported_by: user.id,
        user: UserRecord::from(&target),
        vibrate_data: readings.into_iter().map(ReadingInfo::from).collect(),
        audit_logs: entries_to_info(entries),
    })
}

/// Deletes an account by anonymizing it.
///
/// Users may delete their own account; super admins may delete anyone's
/// except another super admin's. Readings and audit entries keep pointing
/// at the anonymized row.
///
/// # Errors
///
/// Returns an error if the caller is not allowed, the confirmation string
/// is missing, the target is protected or already deleted, or a write
/// fails.
pub fn delete_account(
    persistence: &mut Persistence,
    target_id: i64,
    request: &DeleteAccountRequest,
    user: &AuthenticatedUser,
    ip: Option<&str>,
) -> Result<MessageResponse, ApiError> {
    let self_deletion: bool = user.id == target_id;
    if !self_deletion && user.role != Role::SuperAdmin {
        return Err(deny_access(
            persistence,
            user,
            "delete account",
            "self or super_admin",
            "DELETE /api/users/:id",
            ip,
        ));
    }

    if request.confirmation.as_deref() != Some(DELETE_CONFIRMATION) {
        return Err(ApiError::InvalidInput {
            field: String::from("confirmation"),
            message: format!("Confirmation must be '{DELETE_CONFIRMATION}'"),
        });
    }

    let target: UserData = load_user(persistence, target_id)?;
    if target.role == Role::SuperAdmin {
        return Err(translate_domain_error(DomainError::SuperAdminProtected {
            operation: String::from("delete"),
        }));
    }
    if target.deleted_at.is_some() {
        return Err(ApiError::ResourceNotFound {
            resource_type: String::from("User"),
            message: format!("User {target_id} has already been deleted"),
        });
    }

    persistence
        .anonymize_user(target_id, user.id)
        .map_err(translate_persistence_error)?;

    record_audit(
        persistence,
        user.to_audit_actor(),
        AuditAction::UserAccountDeleted,
        json!({ "targetUserId": target_id, "selfDeletion": self_deletion }),
        ip,
    );

    info!(target_id, deleted_by = user.id, "Account deleted");
    Ok(MessageResponse::new("Account deleted successfully"))
}

// ============================================================================
// Administration
// ============================================================================

/// Lists users with optional role and status filters.
///
/// # Errors
///
/// Returns an error if the caller is not an administrator, a filter is
/// malformed, or the query fails.
pub fn list_users(
    persistence: &mut Persistence,
    query: &AdminUserListQuery,
    user: &AuthenticatedUser,
    ip: Option<&str>,
) -> Result<UserListResponse, ApiError> {
    enforce_roles(
        persistence,
        user,
        &ADMIN_ROLES,
        "list users",
        "GET /api/admin/users",
        ip,
    )?;

    let filter: UserListFilter = query.filter()?;
    let pagination: Pagination = query.pagination();
    let page: Page<UserData> = persistence
        .list_users(filter, pagination)
        .map_err(translate_persistence_error)?;

    Ok(UserListResponse {
        users: page.items.iter().map(UserRecord::from).collect(),
        pagination: PaginationInfo::new(pagination, page.total),
    })
}

/// Lists accounts awaiting approval.
///
/// # Errors
///
/// Returns an error if the caller is not an administrator or the query
/// fails.
pub fn list_pending_users(
    persistence: &mut Persistence,
    user: &AuthenticatedUser,
    ip: Option<&str>,
) -> Result<PendingUsersResponse, ApiError> {
    enforce_roles(
        persistence,
        user,
        &ADMIN_ROLES,
        "list pending users",
        "GET /api/admin/users/pending",
        ip,
    )?;

    let users: Vec<UserRecord> = persistence
        .list_pending_users()
        .map_err(translate_persistence_error)?
        .iter()
        .map(UserRecord::from)
        .collect();

    Ok(PendingUsersResponse {
        count: users.len(),
        users,
    })
}

/// Returns one user with their most recent audit activity.
///
/// # Errors
///
/// Returns an error if the caller is not an administrator, the user does
/// not exist, or a query fails.
pub fn get_user_detail(
    persistence: &mut Persistence,
    target_id: i64,
    user: &AuthenticatedUser,
    ip: Option<&str>,
) -> Result<UserDetailResponse, ApiError> {
    enforce_roles(
        persistence,
        user,
        &ADMIN_ROLES,
        "view user",
        "GET /api/admin/users/:id",
        ip,
    )?;

    let target: UserData = load_user(persistence, target_id)?;
    let entries: Vec<AuditLogEntry> = persistence
        .audit_entries_for_actor(target_id, RECENT_ACTIVITY_LIMIT)
        .map_err(translate_persistence_error)?;

    Ok(UserDetailResponse {
        user: UserRecord::from(&target),
        recent_activity: entries_to_info(entries),
    })
}

fn apply_approve(
    persistence: &mut Persistence,
    target: &UserData,
    actor: &AuthenticatedUser,
) -> Result<(), ApiError> {
    target
        .account_state()
        .approve()
        .map_err(translate_domain_error)?;
    persistence
        .approve_user(target.user_id, actor.id)
        .map_err(translate_persistence_error)
}

fn apply_deactivate(
    persistence: &mut Persistence,
    target: &UserData,
    actor: &AuthenticatedUser,
    reason: &str,
) -> Result<(), ApiError> {
    if target.user_id == actor.id {
        return Err(ApiError::Forbidden {
            message: String::from("Cannot deactivate your own account"),
        });
    }
    target
        .account_state()
        .deactivate()
        .map_err(translate_domain_error)?;
    persistence
        .deactivate_user(target.user_id, actor.id, reason)
        .map_err(translate_persistence_error)
}

fn apply_change_role(
    persistence: &mut Persistence,
    target: &UserData,
    actor: &AuthenticatedUser,
    new_role: Role,
) -> Result<(), ApiError> {
    if target.user_id == actor.id {
        return Err(ApiError::Forbidden {
            message: String::from("Cannot change your own role"),
        });
    }
    target
        .account_state()
        .change_role(new_role, actor.role)
        .map_err(translate_domain_error)?;
    persistence
        .change_user_role(target.user_id, new_role, actor.id)
        .map_err(translate_persistence_error)
}

/// Trims a deactivation reason, applying the default and length limit.
fn deactivation_reason(raw: Option<&str>) -> Result<String, ApiError> {
    let reason: &str = raw
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(DEFAULT_DEACTIVATION_REASON);
    if reason.chars().count() > NOTES_MAX_LEN {
        return Err(ApiError::InvalidInput {
            field: String::from("reason"),
            message: format!("Reason must not exceed {NOTES_MAX_LEN} characters"),
        });
    }
    Ok(reason.to_string())
}

fn parse_role(raw: &str) -> Result<Role, ApiError> {
    Role::from_str(raw.trim()).map_err(translate_domain_error)
}

fn missing_bulk_role() -> ApiError {
    ApiError::InvalidInput {
        field: String::from("data.role"),
        message: String::from("Role is required for changeRole"),
    }
}

/// Applies one bulk operation to one user.
fn apply_bulk(
    persistence: &mut Persistence,
    target: &UserData,
    actor: &AuthenticatedUser,
    operation: BulkOperation,
    new_role: Option<Role>,
    reason: &str,
) -> Result<(), ApiError> {
    match operation {
        BulkOperation::Approve => apply_approve(persistence, target, actor),
        BulkOperation::Deactivate => apply_deactivate(persistence, target, actor, reason),
        BulkOperation::ChangeRole => {
            let role: Role = new_role.ok_or_else(missing_bulk_role)?;
            apply_change_role(persistence, target, actor, role)
        }
    }
}

/// Approves a pending account.
///
/// # Errors
///
/// Returns an error if the caller is not an administrator, the user does
/// not exist, the account is not pending, or the update fails.
pub fn approve_user(
    persistence: &mut Persistence,
    target_id: i64,
    user: &AuthenticatedUser,
    ip: Option<&str>,
) -> Result<UserActionResponse, ApiError> {
    enforce_roles(
        persistence,
        user,
        &ADMIN_ROLES,
        "approve user",
        "POST /api/admin/users/:id/approve",
        ip,
    )?;

    let target: UserData = load_user(persistence, target_id)?;
    apply_approve(persistence, &target, user)?;

    record_audit(
        persistence,
        user.to_audit_actor(),
        AuditAction::UserApproved,
        json!({ "targetUserId": target_id, "targetUserEmail": target.email }),
        ip,
    );

    Ok(UserActionResponse {
        message: String::from("User approved successfully"),
        user: UserRecord::from(&load_user(persistence, target_id)?),
    })
}

/// Deactivates an account and revokes its sessions.
///
/// # Errors
///
/// Returns an error if the caller is not an administrator, the reason is
/// too long, the user does not exist, the target is protected, or the
/// update fails.
pub fn deactivate_user(
    persistence: &mut Persistence,
    target_id: i64,
    request: &DeactivateRequest,
    user: &AuthenticatedUser,
    ip: Option<&str>,
) -> Result<UserActionResponse, ApiError> {
    enforce_roles(
        persistence,
        user,
        &ADMIN_ROLES,
        "deactivate user",
        "POST /api/admin/users/:id/deactivate",
        ip,
    )?;

    let reason: String = deactivation_reason(request.reason.as_deref())?;
    let target: UserData = load_user(persistence, target_id)?;
    apply_deactivate(persistence, &target, user, &reason)?;

    record_audit(
        persistence,
        user.to_audit_actor(),
        AuditAction::UserDeactivated,
        json!({ "targetUserId": target_id, "targetUserEmail": target.email, "reason": reason }),
        ip,
    );

    Ok(UserActionResponse {
        message: String::from("User deactivated successfully"),
        user: UserRecord::from(&load_user(persistence, target_id)?),
    })
}

/// Changes an account's role.
///
/// # Errors
///
/// Returns an error if the caller is not an administrator, the role is
/// invalid or not grantable by the caller, the target is protected, or
/// the update fails.
pub fn change_user_role(
    persistence: &mut Persistence,
    target_id: i64,
    request: &ChangeRoleRequest,
    user: &AuthenticatedUser,
    ip: Option<&str>,
) -> Result<UserActionResponse, ApiError> {
    enforce_roles(
        persistence,
        user,
        &ADMIN_ROLES,
        "change user role",
        "PUT /api/admin/users/:id/role",
        ip,
    )?;

    let new_role: Role = parse_role(&request.role)?;
    let target: UserData = load_user(persistence, target_id)?;
    apply_change_role(persistence, &target, user, new_role)?;

    record_audit(
        persistence,
        user.to_audit_actor(),
        AuditAction::UserRoleChanged,
        json!({
            "targetUserId": target_id,
            "targetUserEmail": target.email,
            "oldRole": target.role.as_str(),
            "newRole": new_role.as_str(),
        }),
        ip,
    );

    Ok(UserActionResponse {
        message: String::from("User role updated successfully"),
        user: UserRecord::from(&load_user(persistence, target_id)?),
    })
}

/// Sets a new password for another user and revokes their sessions.
///
/// # Errors
///
/// Returns an error if the caller is not a super admin, the password
/// violates the policy, the user does not exist, or the update fails.
pub fn reset_user_password(
    persistence: &mut Persistence,
    target_id: i64,
    request: &ResetPasswordRequest,
    user: &AuthenticatedUser,
    ip: Option<&str>,
) -> Result<MessageResponse, ApiError> {
    enforce_roles(
        persistence,
        user,
        &SUPER_ADMIN_ONLY,
        "reset user password",
        "POST /api/admin/users/:id/reset-password",
        ip,
    )?;

    PasswordPolicy::default().validate(&request.new_password)?;
    let target: UserData = load_user(persistence, target_id)?;

    let revoked: usize = persistence
        .reset_password(target_id, &request.new_password, user.id)
        .map_err(translate_persistence_error)?;

    record_audit(
        persistence,
        user.to_audit_actor(),
        AuditAction::PasswordResetByAdmin,
        json!({
            "targetUserId": target_id,
            "targetUserEmail": target.email,
            "sessionsRevoked": revoked,
        }),
        ip,
    );

    Ok(MessageResponse::new("Password reset successfully"))
}

/// Applies one operation to many users.
///
/// Each user is processed independently through the same rules as the
/// single-user endpoints. Failures are reported per user and do not stop
/// the batch.
///
/// # Errors
///
/// Returns an error if the caller is not an administrator, or the action,
/// user list or action data is malformed.
pub fn bulk_update_users(
    persistence: &mut Persistence,
    request: &BulkRequest,
    user: &AuthenticatedUser,
    ip: Option<&str>,
) -> Result<BulkResponse, ApiError> {
    enforce_roles(
        persistence,
        user,
        &ADMIN_ROLES,
        "bulk update users",
        "POST /api/admin/users/bulk",
        ip,
    )?;

    let operation: BulkOperation =
        BulkOperation::from_str(&request.action).map_err(|message| ApiError::InvalidInput {
            field: String::from("action"),
            message,
        })?;
    if request.user_ids.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("userIds"),
            message: String::from("At least one user id is required"),
        });
    }

    let new_role: Option<Role> = match operation {
        BulkOperation::ChangeRole => {
            let raw: &str = request
                .data
                .role
                .as_deref()
                .ok_or_else(missing_bulk_role)?;
            Some(parse_role(raw)?)
        }
        BulkOperation::Approve | BulkOperation::Deactivate => None,
    };
    let reason: String = match operation {
        BulkOperation::Deactivate => deactivation_reason(request.data.reason.as_deref())?,
        BulkOperation::Approve | BulkOperation::ChangeRole => String::new(),
    };

    let mut results: BulkResults = BulkResults::default();

    for &target_id in &request.user_ids {
        let outcome: Result<UserData, ApiError> =
            load_user(persistence, target_id).and_then(|target| {
                apply_bulk(persistence, &target, user, operation, new_role, &reason)
                    .map(|()| target)
            });

        match outcome {
            Ok(target) => {
                record_audit(
                    persistence,
                    user.to_audit_actor(),
                    AuditAction::for_bulk(operation),
                    json!({
                        "targetUserId": target_id,
                        "targetUserEmail": target.email,
                        "data": {
                            "reason": request.data.reason,
                            "role": request.data.role,
                        },
                    }),
                    ip,
                );
                results.success.push(BulkSuccess {
                    user_id: target_id,
                    email: target.email,
                    name: target.name,
                });
            }
            Err(e) => {
                warn!(target_id, error = %e, "Bulk operation failed for user");
                results.failed.push(BulkFailure {
                    user_id: target_id,
                    error: e.to_string(),
                });
            }
        }
    }

    info!(
        action = operation.as_str(),
        succeeded = results.success.len(),
        failed = results.failed.len(),
        "Bulk operation completed"
    );

    Ok(BulkResponse {
        message: format!(
            "Bulk {} completed: {} succeeded, {} failed",
            operation.as_str(),
            results.success.len(),
            results.failed.len()
        ),
        results,
    })
}

/// Returns aggregate user, reading and activity figures.
///
/// # Arguments
///
/// * `today` - The day counted as "today" for reading counts
///
/// # Errors
///
/// Returns an error if the caller is not an administrator or a query
/// fails.
pub fn get_system_stats(
    persistence: &mut Persistence,
    today: Date,
    user: &AuthenticatedUser,
    ip: Option<&str>,
) -> Result<StatsResponse, ApiError> {
    enforce_roles(
        persistence,
        user,
        &ADMIN_ROLES,
        "view system stats",
        "GET /api/admin/stats",
        ip,
    )?;

    let users: UserStats = persistence
        .user_stats()
        .map_err(translate_persistence_error)?;
    let readings: ReadingStats = persistence
        .reading_stats(today)
        .map_err(translate_persistence_error)?;
    let entries: Vec<AuditLogEntry> = persistence
        .recent_audit_entries(RECENT_ACTIVITY_LIMIT)
        .map_err(translate_persistence_error)?;

    Ok(StatsResponse {
        users: UserStatsInfo {
            total: users.total,
            active: users.active,
            approved: users.approved,
            pending: users.pending,
            by_role: users.by_role,
        },
        data: DataStatsInfo {
            total_records: readings.total,
            today_records: readings.today,
            unique_dates: readings.unique_dates,
        },
        recent_activity: entries_to_info(entries),
    })
}

/// Lists audit log entries, newest first.
///
/// # Errors
///
/// Returns an error if the caller is not an administrator, a filter is
/// malformed, or the query fails.
pub fn list_audit_logs(
    persistence: &mut Persistence,
    query: &AuditLogQuery,
    user: &AuthenticatedUser,
    ip: Option<&str>,
) -> Result<AuditLogResponse, ApiError> {
    enforce_roles(
        persistence,
        user,
        &ADMIN_ROLES,
        "view audit logs",
        "GET /api/admin/audit-logs",
        ip,
    )?;

    let filter: AuditLogFilter = query.filter()?;
    let pagination: Pagination = query.pagination();
    let page: Page<AuditLogEntry> = persistence
        .list_audit_log(&filter, pagination)
        .map_err(translate_persistence_error)?;

    Ok(AuditLogResponse {
        logs: entries_to_info(page.items),
        pagination: PaginationInfo::new(pagination, page.total),
    })
}
