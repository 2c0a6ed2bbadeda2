// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the vibration monitoring service.
//!
//! This crate sits between the HTTP server and the domain and persistence
//! crates. It owns the request and response contract, authentication and
//! role checks, the password policy, and the translation of lower-level
//! errors into API errors. It has no knowledge of HTTP.

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod error;
mod handlers;
mod password_policy;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedUser, AuthenticationService, AuthorizationService};
pub use error::{ApiError, AuthError, translate_domain_error, translate_persistence_error};
pub use handlers::{
    DELETE_CONFIRMATION, analyze_readings, approve_user, bulk_update_users, change_password,
    change_user_role, deactivate_user, delete_account, delete_reading, ensure_super_admin,
    export_user_data, get_catalog, get_profile, get_system_stats, get_user_detail, health,
    list_audit_logs, list_directory, list_pending_users, list_readings, list_users, login, logout,
    register, reset_user_password, save_reading, search_directory, update_profile,
};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    AdminUserListQuery, AnalysisQuery, AnalysisResponse, AnalysisSummary, AuditLogInfo,
    AuditLogQuery, AuditLogResponse, BulkData, BulkFailure, BulkRequest, BulkResponse,
    BulkResults, BulkSuccess, CatalogResponse, ChangePasswordRequest, ChangeRoleRequest,
    DEFAULT_AUDIT_PAGE_SIZE, DEFAULT_READINGS_PAGE_SIZE, DEFAULT_USERS_PAGE_SIZE, DataStatsInfo,
    DeactivateRequest, DeleteAccountRequest, DirectoryEntry, DirectoryQuery, DirectoryResponse,
    ExportResponse, HealthResponse, LoginRequest, LoginResponse, MessageResponse, PaginationInfo,
    PendingUsersResponse, ProfileResponse, ReadingInfo, ReadingListQuery, ReadingListResponse,
    RegisterRequest, RegisterResponse, ResetPasswordRequest, SaveReadingRequest,
    SaveReadingResponse, StatsResponse, UpdateProfileRequest, UserActionResponse,
    UserDetailResponse, UserListResponse, UserProfile, UserRecord, UserStatsInfo,
};
