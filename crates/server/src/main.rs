// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod extract;
mod http_error;
mod session;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use time::{Date, Duration, OffsetDateTime};
use tokio::sync::Mutex;
use tracing::{info, warn};
use vibemon_api::{
    AdminUserListQuery, AnalysisQuery, AnalysisResponse, AuditLogQuery, AuditLogResponse,
    BulkRequest, BulkResponse, CatalogResponse, ChangePasswordRequest, ChangeRoleRequest,
    DeactivateRequest, DeleteAccountRequest, DirectoryQuery, DirectoryResponse, ExportResponse,
    HealthResponse, LoginRequest, LoginResponse, MessageResponse, PendingUsersResponse,
    ProfileResponse, ReadingListQuery, ReadingListResponse, RegisterRequest, RegisterResponse,
    ResetPasswordRequest, SaveReadingRequest, SaveReadingResponse, StatsResponse,
    UpdateProfileRequest, UserActionResponse, UserDetailResponse, UserListResponse,
    analyze_readings, approve_user, bulk_update_users, change_password, change_user_role,
    deactivate_user, delete_account, delete_reading, ensure_super_admin, export_user_data,
    get_catalog, get_profile, get_system_stats, get_user_detail, health, list_audit_logs,
    list_directory, list_pending_users, list_readings, list_users, login, logout, register,
    reset_user_password, save_reading, search_directory, update_profile,
};
use vibemon_persistence::{Persistence, SaveOutcome};

use crate::extract::{ApiJson, ClientIp, OptionalJson};
use crate::http_error::HttpError;
use crate::session::SessionUser;

/// Longest login session the server will issue, in days.
const MAX_SESSION_DAYS: u32 = 3650;

/// Vibration monitor server - HTTP API for equipment vibration readings
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "VIBEMON_DATABASE")]
    database: Option<String>,

    /// Address to bind the server to
    #[arg(short, long, env = "VIBEMON_BIND", default_value = "0.0.0.0")]
    bind: IpAddr,

    /// Port to bind the server to
    #[arg(short, long, env = "VIBEMON_PORT", default_value_t = 5000)]
    port: u16,

    /// Lifetime of a login session, in days
    #[arg(
        long,
        env = "VIBEMON_SESSION_DAYS",
        default_value_t = 7,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_SESSION_DAYS))
    )]
    session_days: u32,

    /// Email of the bootstrap super admin account
    #[arg(
        long,
        env = "SUPER_ADMIN_EMAIL",
        default_value = "admin@vibratemonitor.com"
    )]
    super_admin_email: String,

    /// Password of the bootstrap super admin account, used only when the
    /// account is created
    #[arg(
        long,
        env = "SUPER_ADMIN_PASSWORD",
        default_value = "SuperAdmin123!",
        hide_env_values = true
    )]
    super_admin_password: String,
}

/// Application state shared across handlers.
///
/// This contains the persistence layer wrapped in a Mutex to allow
/// safe concurrent access.
#[derive(Clone)]
struct AppState {
    /// The persistence layer for users, sessions, readings and audit entries.
    persistence: Arc<Mutex<Persistence>>,
    /// Lifetime of newly issued sessions.
    session_lifetime: Duration,
}

fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

// ============================================================================
// Public endpoints
// ============================================================================

async fn handle_health() -> Json<HealthResponse> {
    Json(health(env!("CARGO_PKG_VERSION")))
}

/// Handler for POST `/api/auth/register`.
async fn handle_register(
    AxumState(app_state): AxumState<AppState>,
    ClientIp(ip): ClientIp,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), HttpError> {
    info!(email = %req.email, "Handling register request");

    let mut persistence = app_state.persistence.lock().await;
    let response: RegisterResponse = register(&mut persistence, &req, ip.as_deref())?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for POST `/api/auth/login`.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    ClientIp(ip): ClientIp,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    info!(email = %req.email, "Handling login request");

    let mut persistence = app_state.persistence.lock().await;
    let response: LoginResponse = login(
        &mut persistence,
        &req,
        app_state.session_lifetime,
        ip.as_deref(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

// ============================================================================
// Session endpoints
// ============================================================================

async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, token): SessionUser,
    ClientIp(ip): ClientIp,
) -> Result<Json<MessageResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(logout(&mut persistence, &token, &user, ip.as_deref())?))
}

async fn handle_get_profile(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
) -> Result<Json<ProfileResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(get_profile(&mut persistence, &user)?))
}

async fn handle_update_profile(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    ClientIp(ip): ClientIp,
    ApiJson(req): ApiJson<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(update_profile(
        &mut persistence,
        &req,
        &user,
        ip.as_deref(),
    )?))
}

async fn handle_change_password(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    ClientIp(ip): ClientIp,
    ApiJson(req): ApiJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(change_password(
        &mut persistence,
        &req,
        &user,
        ip.as_deref(),
    )?))
}

// ============================================================================
// Readings
// ============================================================================

async fn handle_list_readings(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    ClientIp(ip): ClientIp,
    Query(query): Query<ReadingListQuery>,
) -> Result<Json<ReadingListResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_readings(
        &mut persistence,
        &query,
        &user,
        ip.as_deref(),
    )?))
}

/// Handler for POST `/api/data`.
///
/// Responds 201 when the reading is new and 200 when it replaced one.
async fn handle_save_reading(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    ClientIp(ip): ClientIp,
    ApiJson(req): ApiJson<SaveReadingRequest>,
) -> Result<(StatusCode, Json<SaveReadingResponse>), HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let (outcome, response) = save_reading(&mut persistence, req, &user, ip.as_deref())?;
    drop(persistence);

    let status: StatusCode = match outcome {
        SaveOutcome::Created => StatusCode::CREATED,
        SaveOutcome::Updated => StatusCode::OK,
    };
    Ok((status, Json(response)))
}

async fn handle_delete_reading(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    ClientIp(ip): ClientIp,
    Path(reading_id): Path<String>,
) -> Result<Json<MessageResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(delete_reading(
        &mut persistence,
        &reading_id,
        &user,
        ip.as_deref(),
    )?))
}

async fn handle_analysis(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    ClientIp(ip): ClientIp,
    Query(query): Query<AnalysisQuery>,
) -> Result<Json<AnalysisResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(analyze_readings(
        &mut persistence,
        &query,
        today(),
        &user,
        ip.as_deref(),
    )?))
}

async fn handle_catalog(SessionUser(_, _): SessionUser) -> Json<CatalogResponse> {
    Json(get_catalog())
}

// ============================================================================
// User directory and self-service
// ============================================================================

async fn handle_list_directory(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(_, _): SessionUser,
) -> Result<Json<DirectoryResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_directory(&mut persistence)?))
}

async fn handle_search_directory(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(_, _): SessionUser,
    Query(query): Query<DirectoryQuery>,
) -> Result<Json<DirectoryResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(search_directory(&mut persistence, &query)?))
}

async fn handle_export_user_data(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    ClientIp(ip): ClientIp,
    Path(user_id): Path<i64>,
) -> Result<Json<ExportResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(export_user_data(
        &mut persistence,
        user_id,
        &user,
        ip.as_deref(),
    )?))
}

async fn handle_delete_account(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    ClientIp(ip): ClientIp,
    Path(user_id): Path<i64>,
    OptionalJson(req): OptionalJson<DeleteAccountRequest>,
) -> Result<Json<MessageResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(delete_account(
        &mut persistence,
        user_id,
        &req,
        &user,
        ip.as_deref(),
    )?))
}

// ============================================================================
// Administration
// ============================================================================

async fn handle_list_users(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    ClientIp(ip): ClientIp,
    Query(query): Query<AdminUserListQuery>,
) -> Result<Json<UserListResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_users(
        &mut persistence,
        &query,
        &user,
        ip.as_deref(),
    )?))
}

async fn handle_list_pending_users(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    ClientIp(ip): ClientIp,
) -> Result<Json<PendingUsersResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_pending_users(
        &mut persistence,
        &user,
        ip.as_deref(),
    )?))
}

async fn handle_get_user_detail(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    ClientIp(ip): ClientIp,
    Path(user_id): Path<i64>,
) -> Result<Json<UserDetailResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(get_user_detail(
        &mut persistence,
        user_id,
        &user,
        ip.as_deref(),
    )?))
}

async fn handle_approve_user(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    ClientIp(ip): ClientIp,
    Path(user_id): Path<i64>,
) -> Result<Json<UserActionResponse>, HttpError> {
    info!(target_id = user_id, actor_id = user.id, "Handling approve request");

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(approve_user(
        &mut persistence,
        user_id,
        &user,
        ip.as_deref(),
    )?))
}

async fn handle_deactivate_user(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    ClientIp(ip): ClientIp,
    Path(user_id): Path<i64>,
    OptionalJson(req): OptionalJson<DeactivateRequest>,
) -> Result<Json<UserActionResponse>, HttpError> {
    info!(target_id = user_id, actor_id = user.id, "Handling deactivate request");

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(deactivate_user(
        &mut persistence,
        user_id,
        &req,
        &user,
        ip.as_deref(),
    )?))
}

async fn handle_change_user_role(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    ClientIp(ip): ClientIp,
    Path(user_id): Path<i64>,
    ApiJson(req): ApiJson<ChangeRoleRequest>,
) -> Result<Json<UserActionResponse>, HttpError> {
    info!(
        target_id = user_id,
        actor_id = user.id,
        role = %req.role,
        "Handling change role request"
    );

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(change_user_role(
        &mut persistence,
        user_id,
        &req,
        &user,
        ip.as_deref(),
    )?))
}

async fn handle_reset_password(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    ClientIp(ip): ClientIp,
    Path(user_id): Path<i64>,
    ApiJson(req): ApiJson<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(reset_user_password(
        &mut persistence,
        user_id,
        &req,
        &user,
        ip.as_deref(),
    )?))
}

async fn handle_bulk_update(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    ClientIp(ip): ClientIp,
    ApiJson(req): ApiJson<BulkRequest>,
) -> Result<Json<BulkResponse>, HttpError> {
    info!(
        action = %req.action,
        count = req.user_ids.len(),
        "Handling bulk user update"
    );

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(bulk_update_users(
        &mut persistence,
        &req,
        &user,
        ip.as_deref(),
    )?))
}

async fn handle_system_stats(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    ClientIp(ip): ClientIp,
) -> Result<Json<StatsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(get_system_stats(
        &mut persistence,
        today(),
        &user,
        ip.as_deref(),
    )?))
}

async fn handle_audit_logs(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    ClientIp(ip): ClientIp,
    Query(query): Query<AuditLogQuery>,
) -> Result<Json<AuditLogResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_audit_logs(
        &mut persistence,
        &query,
        &user,
        ip.as_deref(),
    )?))
}

async fn handle_not_found() -> HttpError {
    HttpError::not_found("Endpoint not found")
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handle_health))
        .route("/api/auth/register", post(handle_register))
        .route("/api/auth/login", post(handle_login))
        .route("/api/auth/logout", post(handle_logout))
        .route(
            "/api/auth/profile",
            get(handle_get_profile).put(handle_update_profile),
        )
        .route("/api/auth/change-password", put(handle_change_password))
        .route(
            "/api/data",
            get(handle_list_readings).post(handle_save_reading),
        )
        .route("/api/data/analysis", get(handle_analysis))
        .route("/api/data/config", get(handle_catalog))
        .route("/api/data/{id}", delete(handle_delete_reading))
        .route("/api/users", get(handle_list_directory))
        .route("/api/users/search", get(handle_search_directory))
        .route("/api/users/{id}", delete(handle_delete_account))
        .route("/api/users/{id}/export", get(handle_export_user_data))
        .route("/api/admin/users", get(handle_list_users))
        .route("/api/admin/users/pending", get(handle_list_pending_users))
        .route("/api/admin/users/bulk", post(handle_bulk_update))
        .route("/api/admin/users/{id}", get(handle_get_user_detail))
        .route("/api/admin/users/{id}/approve", post(handle_approve_user))
        .route(
            "/api/admin/users/{id}/deactivate",
            post(handle_deactivate_user),
        )
        .route("/api/admin/users/{id}/role", put(handle_change_user_role))
        .route(
            "/api/admin/users/{id}/reset-password",
            post(handle_reset_password),
        )
        .route("/api/admin/stats", get(handle_system_stats))
        .route("/api/admin/audit-logs", get(handle_audit_logs))
        .fallback(handle_not_found)
        .with_state(app_state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing vibration monitor server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let purged: usize = persistence.delete_expired_sessions()?;
    if purged > 0 {
        info!(purged, "Removed expired sessions");
    }

    if ensure_super_admin(
        &mut persistence,
        &args.super_admin_email,
        &args.super_admin_password,
    )? {
        info!(email = %args.super_admin_email, "Created bootstrap super admin account");
    }

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        session_lifetime: Duration::days(i64::from(args.session_days)),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: SocketAddr = SocketAddr::new(args.bind, args.port);
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}
