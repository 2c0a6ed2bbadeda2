// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session mutations.

use diesel::prelude::*;
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::diesel_schema::sessions;
use crate::error::PersistenceError;
use crate::timestamp::now_timestamp;

/// Creates a new session for a user.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `session_token` - The unique session token
/// * `user_id` - The user ID
/// * `expires_at` - The expiration timestamp in stored form
///
/// # Errors
///
/// Returns an error if the session cannot be created.
pub fn create_session(
    conn: &mut SqliteConnection,
    session_token: &str,
    user_id: i64,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    debug!(
        "Creating session for user ID: {} with expiration: {}",
        user_id, expires_at
    );

    let now: String = now_timestamp();
    diesel::insert_into(sessions::table)
        .values((
            sessions::session_token.eq(session_token),
            sessions::user_id.eq(user_id),
            sessions::created_at.eq(&now),
            sessions::last_activity_at.eq(&now),
            sessions::expires_at.eq(expires_at),
        ))
        .execute(conn)?;

    let session_id: i64 = conn.get_last_insert_rowid()?;
    debug!(session_id, "Session created");
    Ok(session_id)
}

/// Updates the last activity timestamp for a session.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_session_activity(
    conn: &mut SqliteConnection,
    session_id: i64,
) -> Result<(), PersistenceError> {
    debug!("Updating last_activity_at for session ID: {}", session_id);

    diesel::update(sessions::table)
        .filter(sessions::session_id.eq(session_id))
        .set(sessions::last_activity_at.eq(now_timestamp()))
        .execute(conn)?;

    Ok(())
}

/// Deletes a session by token.
///
/// Deleting an unknown token is not an error.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_session(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<(), PersistenceError> {
    debug!("Deleting session by token");

    diesel::delete(sessions::table)
        .filter(sessions::session_token.eq(session_token))
        .execute(conn)?;

    Ok(())
}

/// Deletes all sessions for a user.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_sessions_for_user(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<usize, PersistenceError> {
    let rows_affected: usize = diesel::delete(sessions::table)
        .filter(sessions::user_id.eq(user_id))
        .execute(conn)?;

    info!(
        "Deleted {} sessions for user ID: {}",
        rows_affected, user_id
    );
    Ok(rows_affected)
}

/// Deletes every session that expired before `now`.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `now` - The current time in stored form
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_expired_sessions(
    conn: &mut SqliteConnection,
    now: &str,
) -> Result<usize, PersistenceError> {
    debug!("Deleting expired sessions");

    let rows_affected: usize = diesel::delete(sessions::table)
        .filter(sessions::expires_at.lt(now))
        .execute(conn)?;

    info!("Deleted {} expired sessions", rows_affected);
    Ok(rows_affected)
}
