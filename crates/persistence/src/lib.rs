// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the vibration monitor.
//!
//! This crate stores user accounts, bearer sessions, vibration readings and
//! the audit log. It is built on Diesel over `SQLite`.
//!
//! ## Storage
//!
//! - In-memory databases (tests, throwaway servers) get a unique shared-cache
//!   name per instance.
//! - File databases run in WAL mode.
//! - Migrations are embedded and applied when a database is opened.
//! - Foreign key enforcement is verified at startup.
//!
//! ## Layout
//!
//! - `queries/`: read-only lookups, lists and counts
//! - `mutations/`: inserts, updates and deletes
//! - `backend/`: connection setup and the few helpers Diesel has no DSL for
//!
//! [`Persistence`] is the only entry point callers need. Each of its methods
//! forwards to a single query or mutation function.
//!
//! ## Testing Philosophy
//!
//! - Every test opens its own in-memory database
//! - Tests never share state or depend on execution order

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

use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::Date;
use vibemon_audit::AuditEvent;
use vibemon_domain::{Reading, Role};

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod timestamp;

#[cfg(test)]
mod tests;

pub use data_models::{
    AuditLogEntry, AuditLogFilter, NewUser, Page, Pagination, ReadingFilter, ReadingStats,
    SaveOutcome, SessionData, UserData, UserListFilter, UserStats, UserStatusFilter,
};
pub use error::PersistenceError;
pub use timestamp::{format_timestamp, now_timestamp, parse_timestamp};

use backend::PersistenceBackend;

/// Persistence adapter over a single `SQLite` connection.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// so instances never see each other's data.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String =
            format!("file:memdb_vibemon_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection =
            backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::configure_file_database(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        self.conn.verify_foreign_key_enforcement()
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// Creates a user account and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::DuplicateEmail`] if the email is taken.
    pub fn create_user(&mut self, new_user: NewUser<'_>) -> Result<i64, PersistenceError> {
        mutations::users::create_user(&mut self.conn, new_user)
    }

    /// Retrieves a user by email (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_user_by_email(&mut self, email: &str) -> Result<Option<UserData>, PersistenceError> {
        queries::users::get_user_by_email(&mut self.conn, email)
    }

    /// Retrieves a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_user_by_id(&mut self, user_id: i64) -> Result<Option<UserData>, PersistenceError> {
        queries::users::get_user_by_id(&mut self.conn, user_id)
    }

    /// Returns whether an email is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn email_exists(&mut self, email: &str) -> Result<bool, PersistenceError> {
        queries::users::email_exists(&mut self.conn, email)
    }

    /// Lists users for the admin console.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_users(
        &mut self,
        filter: UserListFilter,
        pagination: Pagination,
    ) -> Result<Page<UserData>, PersistenceError> {
        queries::users::list_users(&mut self.conn, filter, pagination)
    }

    /// Lists active users awaiting approval.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_pending_users(&mut self) -> Result<Vec<UserData>, PersistenceError> {
        queries::users::list_pending_users(&mut self.conn)
    }

    /// Lists approved, active users, optionally narrowed by a search term
    /// and role.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_directory(
        &mut self,
        search: Option<&str>,
        role: Option<Role>,
    ) -> Result<Vec<UserData>, PersistenceError> {
        queries::users::list_directory(&mut self.conn, search, role)
    }

    /// Computes aggregate user counts.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn user_stats(&mut self) -> Result<UserStats, PersistenceError> {
        queries::users::user_stats(&mut self.conn)
    }

    /// Verifies a password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored hash is malformed.
    pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PersistenceError> {
        queries::users::verify_password(password, password_hash)
    }

    /// Records a successful login.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or the update fails.
    pub fn update_last_login(&mut self, user_id: i64) -> Result<(), PersistenceError> {
        mutations::users::update_last_login(&mut self.conn, user_id)
    }

    /// Updates a user's display name.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or the update fails.
    pub fn update_profile_name(&mut self, user_id: i64, name: &str) -> Result<(), PersistenceError> {
        mutations::users::update_profile_name(&mut self.conn, user_id, name)
    }

    /// Replaces a user's password.
    ///
    /// # Errors
    ///
    /// Returns an error if hashing or the update fails.
    pub fn update_password(
        &mut self,
        user_id: i64,
        new_password: &str,
    ) -> Result<(), PersistenceError> {
        mutations::users::update_password(&mut self.conn, user_id, new_password)
    }

    /// Marks a user approved.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or the update fails.
    pub fn approve_user(&mut self, user_id: i64, approved_by: i64) -> Result<(), PersistenceError> {
        mutations::users::approve_user(&mut self.conn, user_id, approved_by)
    }

    /// Deactivates a user and revokes their sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or a write fails.
    pub fn deactivate_user(
        &mut self,
        user_id: i64,
        deactivated_by: i64,
        reason: &str,
    ) -> Result<(), PersistenceError> {
        mutations::users::deactivate_user(&mut self.conn, user_id, deactivated_by, reason)
    }

    /// Changes a user's role.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or the update fails.
    pub fn change_user_role(
        &mut self,
        user_id: i64,
        role: Role,
        changed_by: i64,
    ) -> Result<(), PersistenceError> {
        mutations::users::change_user_role(&mut self.conn, user_id, role, changed_by)
    }

    /// Resets a user's password and revokes their sessions. Returns the
    /// number of sessions revoked.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist, hashing fails or a
    /// write fails.
    pub fn reset_password(
        &mut self,
        user_id: i64,
        new_password: &str,
        reset_by: i64,
    ) -> Result<usize, PersistenceError> {
        mutations::users::reset_password(&mut self.conn, user_id, new_password, reset_by)
    }

    /// Anonymizes a user account and revokes its sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or a write fails.
    pub fn anonymize_user(&mut self, user_id: i64, deleted_by: i64) -> Result<(), PersistenceError> {
        mutations::users::anonymize_user(&mut self.conn, user_id, deleted_by)
    }

    // ========================================================================
    // Sessions
    // ========================================================================

    /// Creates a new session for a user.
    ///
    /// # Arguments
    ///
    /// * `session_token` - The unique session token
    /// * `user_id` - The user ID
    /// * `expires_at` - The expiration timestamp in stored form
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be created.
    pub fn create_session(
        &mut self,
        session_token: &str,
        user_id: i64,
        expires_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::sessions::create_session(&mut self.conn, session_token, user_id, expires_at)
    }

    /// Retrieves a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::sessions::get_session_by_token(&mut self.conn, session_token)
    }

    /// Counts the sessions held by a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_sessions_for_user(&mut self, user_id: i64) -> Result<i64, PersistenceError> {
        queries::sessions::count_sessions_for_user(&mut self.conn, user_id)
    }

    /// Updates the last activity timestamp for a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub fn update_session_activity(&mut self, session_id: i64) -> Result<(), PersistenceError> {
        mutations::sessions::update_session_activity(&mut self.conn, session_id)
    }

    /// Deletes a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<(), PersistenceError> {
        mutations::sessions::delete_session(&mut self.conn, session_token)
    }

    /// Deletes all sessions for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_sessions_for_user(&mut self, user_id: i64) -> Result<usize, PersistenceError> {
        mutations::sessions::delete_sessions_for_user(&mut self.conn, user_id)
    }

    /// Deletes all expired sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_expired_sessions(&mut self) -> Result<usize, PersistenceError> {
        mutations::sessions::delete_expired_sessions(&mut self.conn, &now_timestamp())
    }

    // ========================================================================
    // Readings
    // ========================================================================

    /// Inserts or replaces a reading.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or a write fails.
    pub fn save_reading(&mut self, reading: &Reading) -> Result<SaveOutcome, PersistenceError> {
        mutations::readings::save_reading(&mut self.conn, reading)
    }

    /// Retrieves a reading by document id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_reading(&mut self, reading_id: &str) -> Result<Option<Reading>, PersistenceError> {
        queries::readings::get_reading(&mut self.conn, reading_id)
    }

    /// Deletes a reading and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::ReadingNotFound`] if it does not exist.
    pub fn delete_reading(&mut self, reading_id: &str) -> Result<Reading, PersistenceError> {
        mutations::readings::delete_reading(&mut self.conn, reading_id)
    }

    /// Lists readings matching a filter, most recently saved first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_readings(
        &mut self,
        filter: &ReadingFilter,
        pagination: Pagination,
    ) -> Result<Page<Reading>, PersistenceError> {
        queries::readings::list_readings(&mut self.conn, filter, pagination)
    }

    /// Loads every reading dated within `[start, end]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn readings_in_window(
        &mut self,
        start: Date,
        end: Date,
    ) -> Result<Vec<Reading>, PersistenceError> {
        queries::readings::readings_in_window(&mut self.conn, start, end)
    }

    /// Loads every reading recorded by a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn readings_by_creator(&mut self, user_id: i64) -> Result<Vec<Reading>, PersistenceError> {
        queries::readings::readings_by_creator(&mut self.conn, user_id)
    }

    /// Computes aggregate reading counts relative to `today`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn reading_stats(&mut self, today: Date) -> Result<ReadingStats, PersistenceError> {
        queries::readings::reading_stats(&mut self.conn, today)
    }

    // ========================================================================
    // Audit Log
    // ========================================================================

    /// Appends an audit event and returns its entry ID.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the insert fails.
    pub fn persist_audit_event(&mut self, event: &AuditEvent) -> Result<i64, PersistenceError> {
        mutations::audit::persist_audit_event(&mut self.conn, event)
    }

    /// Lists audit log entries matching a filter, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_audit_log(
        &mut self,
        filter: &AuditLogFilter,
        pagination: Pagination,
    ) -> Result<Page<AuditLogEntry>, PersistenceError> {
        queries::audit::list_audit_log(&mut self.conn, filter, pagination)
    }

    /// Returns the most recent audit log entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn recent_audit_entries(&mut self, limit: i64) -> Result<Vec<AuditLogEntry>, PersistenceError> {
        queries::audit::recent_audit_entries(&mut self.conn, limit)
    }

    /// Returns the most recent audit log entries performed by a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn audit_entries_for_actor(
        &mut self,
        actor_id: i64,
        limit: i64,
    ) -> Result<Vec<AuditLogEntry>, PersistenceError> {
        queries::audit::audit_entries_for_actor(&mut self.conn, actor_id, limit)
    }
}
