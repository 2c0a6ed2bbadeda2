// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit log queries.
//!
//! Actor names are resolved against the users table at read time, so an
//! entry shows the actor's current display name. Entries whose actor is
//! the system (or a since-removed id) carry no name.

use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use crate::data_models::{AuditLogEntry, AuditLogFilter, Page, Pagination};
use crate::diesel_schema::{audit_log, users};
use crate::error::PersistenceError;
use crate::timestamp::{end_of_day, start_of_day};

/// Diesel Queryable struct for audit log rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = audit_log)]
struct AuditRow {
    entry_id: i64,
    actor_id: Option<i64>,
    action: String,
    details_json: String,
    ip: Option<String>,
    created_at: String,
}

fn filtered_entries(filter: &AuditLogFilter) -> audit_log::BoxedQuery<'static, Sqlite> {
    let mut query = audit_log::table.into_boxed();

    if let Some(action) = &filter.action {
        query = query.filter(audit_log::action.eq(action.clone()));
    }
    if let Some(actor_id) = filter.actor_id {
        query = query.filter(audit_log::actor_id.eq(actor_id));
    }
    if let Some(from) = filter.date_from {
        query = query.filter(audit_log::created_at.ge(start_of_day(from)));
    }
    if let Some(to) = filter.date_to {
        query = query.filter(audit_log::created_at.le(end_of_day(to)));
    }

    query
}

/// Converts rows into entries, resolving actor names in one lookup.
fn resolve_entries(
    conn: &mut SqliteConnection,
    rows: Vec<AuditRow>,
) -> Result<Vec<AuditLogEntry>, PersistenceError> {
    let actor_ids: BTreeSet<i64> = rows.iter().filter_map(|row| row.actor_id).collect();

    let names: HashMap<i64, String> = if actor_ids.is_empty() {
        HashMap::new()
    } else {
        users::table
            .filter(users::user_id.eq_any(actor_ids))
            .select((users::user_id, users::name))
            .load::<(i64, String)>(conn)?
            .into_iter()
            .collect()
    };

    rows.into_iter()
        .map(|row| {
            Ok(AuditLogEntry {
                entry_id: row.entry_id,
                actor_name: row.actor_id.and_then(|id| names.get(&id).cloned()),
                actor_id: row.actor_id,
                action: row.action,
                details: serde_json::from_str(&row.details_json)?,
                ip: row.ip,
                created_at: row.created_at,
            })
        })
        .collect()
}

/// Lists audit log entries matching `filter`, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails or stored details are
/// not valid JSON.
pub fn list_audit_log(
    conn: &mut SqliteConnection,
    filter: &AuditLogFilter,
    pagination: Pagination,
) -> Result<Page<AuditLogEntry>, PersistenceError> {
    let total: i64 = filtered_entries(filter).count().get_result(conn)?;

    let rows: Vec<AuditRow> = filtered_entries(filter)
        .order((audit_log::created_at.desc(), audit_log::entry_id.desc()))
        .limit(pagination.limit)
        .offset(pagination.offset())
        .select(AuditRow::as_select())
        .load(conn)?;

    debug!(total, returned = rows.len(), "Loaded audit log page");

    Ok(Page {
        items: resolve_entries(conn, rows)?,
        total,
    })
}

/// Returns the `limit` most recent audit log entries.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn recent_audit_entries(
    conn: &mut SqliteConnection,
    limit: i64,
) -> Result<Vec<AuditLogEntry>, PersistenceError> {
    let rows: Vec<AuditRow> = audit_log::table
        .order((audit_log::created_at.desc(), audit_log::entry_id.desc()))
        .limit(limit)
        .select(AuditRow::as_select())
        .load(conn)?;
    resolve_entries(conn, rows)
}

/// Returns the `limit` most recent audit log entries performed by a user.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn audit_entries_for_actor(
    conn: &mut SqliteConnection,
    actor_id: i64,
    limit: i64,
) -> Result<Vec<AuditLogEntry>, PersistenceError> {
    let rows: Vec<AuditRow> = audit_log::table
        .filter(audit_log::actor_id.eq(actor_id))
        .order((audit_log::created_at.desc(), audit_log::entry_id.desc()))
        .limit(limit)
        .select(AuditRow::as_select())
        .load(conn)?;
    resolve_entries(conn, rows)
}
