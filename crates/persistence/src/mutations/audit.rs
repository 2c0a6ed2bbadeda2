// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit log writes.
//!
//! The audit log is append-only. This module exposes inserts only, and
//! database triggers reject any `UPDATE` or `DELETE` on the table.

use diesel::prelude::*;
use tracing::debug;
use vibemon_audit::AuditEvent;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::audit_log;
use crate::error::PersistenceError;
use crate::timestamp::now_timestamp;

/// Persists an audit event.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `event` - The audit event to persist
///
/// # Returns
///
/// The entry ID assigned by the database.
///
/// # Errors
///
/// Returns an error if serialization or the insert fails.
pub fn persist_audit_event(
    conn: &mut SqliteConnection,
    event: &AuditEvent,
) -> Result<i64, PersistenceError> {
    let details_json: String = serde_json::to_string(&event.details)?;

    diesel::insert_into(audit_log::table)
        .values((
            audit_log::actor_id.eq(event.actor.id),
            audit_log::action.eq(event.action.as_str()),
            audit_log::details_json.eq(&details_json),
            audit_log::ip.eq(event.ip.as_deref()),
            audit_log::created_at.eq(now_timestamp()),
        ))
        .execute(conn)?;

    let entry_id: i64 = conn.get_last_insert_rowid()?;
    debug!(entry_id, action = event.action.as_str(), "Audit event persisted");
    Ok(entry_id)
}
