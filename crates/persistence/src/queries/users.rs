// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User account queries.

use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use std::collections::BTreeMap;
use tracing::debug;
use vibemon_domain::Role;

use crate::data_models::{
    Page, Pagination, UserData, UserListFilter, UserStats, UserStatusFilter,
};
use crate::diesel_schema::users;
use crate::error::PersistenceError;

/// Diesel Queryable struct for user rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = users)]
pub(crate) struct UserRow {
    user_id: i64,
    email: String,
    password_hash: String,
    name: String,
    role: String,
    is_approved: i32,
    is_active: i32,
    created_at: String,
    updated_at: String,
    last_login_at: Option<String>,
    approved_at: Option<String>,
    approved_by: Option<i64>,
    deactivated_at: Option<String>,
    deactivated_by: Option<i64>,
    deactivation_reason: Option<String>,
    role_changed_at: Option<String>,
    role_changed_by: Option<i64>,
    password_reset_at: Option<String>,
    password_reset_by: Option<i64>,
    deleted_at: Option<String>,
    deleted_by: Option<i64>,
    original_email: Option<String>,
}

impl TryFrom<UserRow> for UserData {
    type Error = PersistenceError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: Role = row.role.parse().map_err(|_| {
            PersistenceError::CorruptRecord(format!(
                "user {} has unknown role '{}'",
                row.user_id, row.role
            ))
        })?;

        Ok(Self {
            user_id: row.user_id,
            email: row.email,
            password_hash: row.password_hash,
            name: row.name,
            role,
            is_approved: row.is_approved != 0,
            is_active: row.is_active != 0,
            created_at: row.created_at,
            updated_at: row.updated_at,
            last_login_at: row.last_login_at,
            approved_at: row.approved_at,
            approved_by: row.approved_by,
            deactivated_at: row.deactivated_at,
            deactivated_by: row.deactivated_by,
            deactivation_reason: row.deactivation_reason,
            role_changed_at: row.role_changed_at,
            role_changed_by: row.role_changed_by,
            password_reset_at: row.password_reset_at,
            password_reset_by: row.password_reset_by,
            deleted_at: row.deleted_at,
            deleted_by: row.deleted_by,
            original_email: row.original_email,
        })
    }
}

fn into_users(rows: Vec<UserRow>) -> Result<Vec<UserData>, PersistenceError> {
    rows.into_iter().map(UserData::try_from).collect()
}

/// Escapes `LIKE` wildcards so the term matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped: String = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Retrieves a user by email address.
///
/// The email is lowercased before lookup.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the user is not found.
pub fn get_user_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<UserData>, PersistenceError> {
    let normalized: String = email.trim().to_lowercase();
    debug!("Looking up user by email: {}", normalized);

    users::table
        .filter(users::email.eq(&normalized))
        .select(UserRow::as_select())
        .first(conn)
        .optional()?
        .map(UserData::try_from)
        .transpose()
}

/// Retrieves a user by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the user is not found.
pub fn get_user_by_id(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Option<UserData>, PersistenceError> {
    debug!("Looking up user by ID: {}", user_id);

    users::table
        .filter(users::user_id.eq(user_id))
        .select(UserRow::as_select())
        .first(conn)
        .optional()?
        .map(UserData::try_from)
        .transpose()
}

/// Returns whether an email address is already registered.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn email_exists(conn: &mut SqliteConnection, email: &str) -> Result<bool, PersistenceError> {
    let count: i64 = users::table
        .filter(users::email.eq(email))
        .select(count_star())
        .first(conn)?;
    Ok(count > 0)
}

fn filtered_users(filter: UserListFilter) -> users::BoxedQuery<'static, Sqlite> {
    let mut query = users::table.into_boxed();

    if let Some(role) = filter.role {
        query = query.filter(users::role.eq(role.as_str()));
    }

    match filter.status {
        Some(UserStatusFilter::Approved) => query = query.filter(users::is_approved.eq(1)),
        Some(UserStatusFilter::Pending) => query = query.filter(users::is_approved.eq(0)),
        Some(UserStatusFilter::Inactive) => query = query.filter(users::is_active.eq(0)),
        None => {}
    }

    query
}

/// Lists users matching `filter`, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_users(
    conn: &mut SqliteConnection,
    filter: UserListFilter,
    pagination: Pagination,
) -> Result<Page<UserData>, PersistenceError> {
    let total: i64 = filtered_users(filter).count().get_result(conn)?;

    let rows: Vec<UserRow> = filtered_users(filter)
        .order((users::created_at.desc(), users::user_id.desc()))
        .limit(pagination.limit)
        .offset(pagination.offset())
        .select(UserRow::as_select())
        .load(conn)?;

    Ok(Page {
        items: into_users(rows)?,
        total,
    })
}

/// Lists active users awaiting approval, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_pending_users(conn: &mut SqliteConnection) -> Result<Vec<UserData>, PersistenceError> {
    let rows: Vec<UserRow> = users::table
        .filter(users::is_approved.eq(0))
        .filter(users::is_active.eq(1))
        .order((users::created_at.desc(), users::user_id.desc()))
        .select(UserRow::as_select())
        .load(conn)?;
    into_users(rows)
}

/// Lists approved, active users ordered by name.
///
/// `search` matches a case-insensitive substring of the name or email.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_directory(
    conn: &mut SqliteConnection,
    search: Option<&str>,
    role: Option<Role>,
) -> Result<Vec<UserData>, PersistenceError> {
    let mut query = users::table
        .filter(users::is_approved.eq(1))
        .filter(users::is_active.eq(1))
        .into_boxed::<Sqlite>();

    if let Some(role) = role {
        query = query.filter(users::role.eq(role.as_str()));
    }

    if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
        let pattern: String = format!("%{}%", escape_like(&term.to_lowercase()));
        query = query.filter(
            users::name
                .like(pattern.clone())
                .escape('\\')
                .or(users::email.like(pattern).escape('\\')),
        );
    }

    let rows: Vec<UserRow> = query
        .order((users::name.asc(), users::user_id.asc()))
        .select(UserRow::as_select())
        .load(conn)?;
    into_users(rows)
}

/// Computes aggregate user counts.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn user_stats(conn: &mut SqliteConnection) -> Result<UserStats, PersistenceError> {
    let total: i64 = users::table.count().get_result(conn)?;
    let active: i64 = users::table
        .filter(users::is_active.eq(1))
        .count()
        .get_result(conn)?;
    let approved: i64 = users::table
        .filter(users::is_approved.eq(1))
        .count()
        .get_result(conn)?;
    let pending: i64 = users::table
        .filter(users::is_approved.eq(0))
        .filter(users::is_active.eq(1))
        .count()
        .get_result(conn)?;

    let by_role: BTreeMap<String, i64> = users::table
        .group_by(users::role)
        .select((users::role, count_star()))
        .load::<(String, i64)>(conn)?
        .into_iter()
        .collect();

    debug!(total, active, approved, pending, "Computed user stats");

    Ok(UserStats {
        total,
        active,
        approved,
        pending,
        by_role,
    })
}

/// Stored in place of a password hash for anonymized accounts.
pub const DELETED_PASSWORD_HASH: &str = "DELETED";

/// Verifies a password against a stored bcrypt hash.
///
/// Anonymized accounts never verify.
///
/// # Errors
///
/// Returns an error if the stored hash is malformed.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PersistenceError> {
    if password_hash == DELETED_PASSWORD_HASH {
        return Ok(false);
    }
    Ok(bcrypt::verify(password, password_hash)?)
}
