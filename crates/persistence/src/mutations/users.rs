// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User account mutations.
//!
//! Lifecycle rules (who may approve, deactivate or re-role whom) are
//! enforced by the domain state machine before these are called. These
//! functions only write the resulting state and its bookkeeping columns.

use diesel::prelude::*;
use time::OffsetDateTime;
use tracing::{debug, info};
use vibemon_domain::Role;

use crate::backend::PersistenceBackend;
use crate::data_models::NewUser;
use crate::diesel_schema::{sessions, users};
use crate::error::PersistenceError;
use crate::queries::users::{DELETED_PASSWORD_HASH, email_exists};
use crate::timestamp::{format_timestamp, now_timestamp};

/// Fails with [`PersistenceError::UserNotFound`] when an update touched
/// no rows.
const fn ensure_updated(rows_affected: usize, user_id: i64) -> Result<(), PersistenceError> {
    if rows_affected == 0 {
        return Err(PersistenceError::UserNotFound(user_id));
    }
    Ok(())
}

fn hash_password(password: &str) -> Result<String, PersistenceError> {
    Ok(bcrypt::hash(password, bcrypt::DEFAULT_COST)?)
}

/// Creates a new user account.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `new_user` - The account to create; the password is hashed here
///
/// # Errors
///
/// Returns [`PersistenceError::DuplicateEmail`] if the email is taken, or
/// an error if hashing or the insert fails.
pub fn create_user(
    conn: &mut SqliteConnection,
    new_user: NewUser<'_>,
) -> Result<i64, PersistenceError> {
    info!(
        "Creating user with email: {}, role: {}",
        new_user.email, new_user.role
    );

    if email_exists(conn, new_user.email)? {
        return Err(PersistenceError::DuplicateEmail(new_user.email.to_string()));
    }

    let password_hash: String = hash_password(new_user.password)?;
    let now: String = now_timestamp();

    diesel::insert_into(users::table)
        .values((
            users::email.eq(new_user.email),
            users::password_hash.eq(&password_hash),
            users::name.eq(new_user.name),
            users::role.eq(new_user.role.as_str()),
            users::is_approved.eq(i32::from(new_user.is_approved)),
            users::is_active.eq(1),
            users::created_at.eq(&now),
            users::updated_at.eq(&now),
        ))
        .execute(conn)?;

    let user_id: i64 = conn.get_last_insert_rowid()?;

    info!(user_id, "User created successfully");
    Ok(user_id)
}

/// Records a successful login.
///
/// # Errors
///
/// Returns an error if the user does not exist or the update fails.
pub fn update_last_login(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<(), PersistenceError> {
    debug!("Updating last_login_at for user ID: {}", user_id);

    let rows: usize = diesel::update(users::table)
        .filter(users::user_id.eq(user_id))
        .set(users::last_login_at.eq(now_timestamp()))
        .execute(conn)?;
    ensure_updated(rows, user_id)
}

/// Updates a user's display name.
///
/// # Errors
///
/// Returns an error if the user does not exist or the update fails.
pub fn update_profile_name(
    conn: &mut SqliteConnection,
    user_id: i64,
    name: &str,
) -> Result<(), PersistenceError> {
    info!("Updating name for user ID: {}", user_id);

    let rows: usize = diesel::update(users::table)
        .filter(users::user_id.eq(user_id))
        .set((users::name.eq(name), users::updated_at.eq(now_timestamp())))
        .execute(conn)?;
    ensure_updated(rows, user_id)
}

/// Replaces a user's password.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `user_id` - The user ID
/// * `new_password` - The new password (will be hashed)
///
/// # Errors
///
/// Returns an error if the password cannot be hashed or the update fails.
pub fn update_password(
    conn: &mut SqliteConnection,
    user_id: i64,
    new_password: &str,
) -> Result<(), PersistenceError> {
    info!("Updating password for user ID: {}", user_id);

    let password_hash: String = hash_password(new_password)?;
    let rows: usize = diesel::update(users::table)
        .filter(users::user_id.eq(user_id))
        .set((
            users::password_hash.eq(&password_hash),
            users::updated_at.eq(now_timestamp()),
        ))
        .execute(conn)?;
    ensure_updated(rows, user_id)
}

/// Marks a user approved.
///
/// # Errors
///
/// Returns an error if the user does not exist or the update fails.
pub fn approve_user(
    conn: &mut SqliteConnection,
    user_id: i64,
    approved_by: i64,
) -> Result<(), PersistenceError> {
    info!("Approving user ID: {} (by {})", user_id, approved_by);

    let now: String = now_timestamp();
    let rows: usize = diesel::update(users::table)
        .filter(users::user_id.eq(user_id))
        .set((
            users::is_approved.eq(1),
            users::approved_at.eq(&now),
            users::approved_by.eq(approved_by),
            users::updated_at.eq(&now),
        ))
        .execute(conn)?;
    ensure_updated(rows, user_id)
}

/// Deactivates a user, clearing their approval and revoking their sessions.
///
/// # Errors
///
/// Returns an error if the user does not exist or a write fails.
pub fn deactivate_user(
    conn: &mut SqliteConnection,
    user_id: i64,
    deactivated_by: i64,
    reason: &str,
) -> Result<(), PersistenceError> {
    info!("Deactivating user ID: {} (by {})", user_id, deactivated_by);

    let now: String = now_timestamp();
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let rows: usize = diesel::update(users::table)
            .filter(users::user_id.eq(user_id))
            .set((
                users::is_active.eq(0),
                users::is_approved.eq(0),
                users::deactivated_at.eq(&now),
                users::deactivated_by.eq(deactivated_by),
                users::deactivation_reason.eq(reason),
                users::updated_at.eq(&now),
            ))
            .execute(conn)?;
        ensure_updated(rows, user_id)?;

        diesel::delete(sessions::table)
            .filter(sessions::user_id.eq(user_id))
            .execute(conn)?;
        Ok(())
    })
}

/// Changes a user's role.
///
/// # Errors
///
/// Returns an error if the user does not exist or the update fails.
pub fn change_user_role(
    conn: &mut SqliteConnection,
    user_id: i64,
    role: Role,
    changed_by: i64,
) -> Result<(), PersistenceError> {
    info!(
        "Changing role of user ID: {} to {} (by {})",
        user_id, role, changed_by
    );

    let now: String = now_timestamp();
    let rows: usize = diesel::update(users::table)
        .filter(users::user_id.eq(user_id))
        .set((
            users::role.eq(role.as_str()),
            users::role_changed_at.eq(&now),
            users::role_changed_by.eq(changed_by),
            users::updated_at.eq(&now),
        ))
        .execute(conn)?;
    ensure_updated(rows, user_id)
}

/// Sets a new password on behalf of an administrator and revokes every
/// session the user holds.
///
/// # Errors
///
/// Returns an error if the user does not exist, hashing fails or a write
/// fails.
pub fn reset_password(
    conn: &mut SqliteConnection,
    user_id: i64,
    new_password: &str,
    reset_by: i64,
) -> Result<usize, PersistenceError> {
    info!("Resetting password for user ID: {} (by {})", user_id, reset_by);

    let password_hash: String = hash_password(new_password)?;
    let now: String = now_timestamp();

    conn.transaction::<_, PersistenceError, _>(|conn| {
        let rows: usize = diesel::update(users::table)
            .filter(users::user_id.eq(user_id))
            .set((
                users::password_hash.eq(&password_hash),
                users::password_reset_at.eq(&now),
                users::password_reset_by.eq(reset_by),
                users::updated_at.eq(&now),
            ))
            .execute(conn)?;
        ensure_updated(rows, user_id)?;

        let revoked: usize = diesel::delete(sessions::table)
            .filter(sessions::user_id.eq(user_id))
            .execute(conn)?;
        info!("Revoked {} sessions for user ID: {}", revoked, user_id);
        Ok(revoked)
    })
}

/// Anonymizes a user account in place.
///
/// The row is kept so readings and audit entries still reference it. The
/// original email is preserved in `original_email`; the visible email is
/// replaced by a unique placeholder and the password can no longer verify.
///
/// # Errors
///
/// Returns an error if the user does not exist or a write fails.
pub fn anonymize_user(
    conn: &mut SqliteConnection,
    user_id: i64,
    deleted_by: i64,
) -> Result<(), PersistenceError> {
    info!("Anonymizing user ID: {} (by {})", user_id, deleted_by);

    let now: OffsetDateTime = OffsetDateTime::now_utc();
    let stamp: String = format_timestamp(now);
    let millis: i128 = now.unix_timestamp_nanos() / 1_000_000;
    let placeholder_email: String = format!("deleted-{millis}-{user_id}@anonymized.local");

    conn.transaction::<_, PersistenceError, _>(|conn| {
        let original_email: String = users::table
            .filter(users::user_id.eq(user_id))
            .select(users::email)
            .first::<String>(conn)
            .optional()?
            .ok_or(PersistenceError::UserNotFound(user_id))?;

        diesel::update(users::table)
            .filter(users::user_id.eq(user_id))
            .set((
                users::name.eq("Deleted User"),
                users::email.eq(&placeholder_email),
                users::password_hash.eq(DELETED_PASSWORD_HASH),
                users::is_active.eq(0),
                users::is_approved.eq(0),
                users::deleted_at.eq(&stamp),
                users::deleted_by.eq(deleted_by),
                users::original_email.eq(original_email),
                users::updated_at.eq(&stamp),
            ))
            .execute(conn)?;

        diesel::delete(sessions::table)
            .filter(sessions::user_id.eq(user_id))
            .execute(conn)?;
        Ok(())
    })
}
