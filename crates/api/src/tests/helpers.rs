// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use serde_json::{Value, json};
use time::Date;
use vibemon_domain::Role;
use vibemon_persistence::{AuditLogEntry, AuditLogFilter, NewUser, Pagination, Persistence};

use crate::{AuthenticatedUser, SaveReadingRequest};

pub const TEST_PASSWORD: &str = "Secret123";

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("in-memory database")
}

/// Creates a user directly in storage and returns its authenticated view.
pub fn create_test_user(
    persistence: &mut Persistence,
    email: &str,
    name: &str,
    role: Role,
    is_approved: bool,
) -> AuthenticatedUser {
    let user_id: i64 = persistence
        .create_user(NewUser {
            email,
            name,
            password: TEST_PASSWORD,
            role,
            is_approved,
        })
        .expect("create test user");
    let user = persistence.get_user_by_id(user_id).unwrap().unwrap();
    AuthenticatedUser::from_user(&user)
}

pub fn create_test_super_admin(persistence: &mut Persistence) -> AuthenticatedUser {
    create_test_user(
        persistence,
        "root@vibratemonitor.com",
        "Root Admin",
        Role::SuperAdmin,
        true,
    )
}

pub fn create_test_admin(persistence: &mut Persistence) -> AuthenticatedUser {
    create_test_user(
        persistence,
        "admin@vibratemonitor.com",
        "Plant Admin",
        Role::Admin,
        true,
    )
}

pub fn create_test_operator(persistence: &mut Persistence) -> AuthenticatedUser {
    create_test_user(
        persistence,
        "operator@vibratemonitor.com",
        "Field Operator",
        Role::Operator,
        true,
    )
}

pub fn test_date(day: u8) -> Date {
    Date::from_calendar_date(2026, time::Month::March, day).expect("Valid test date")
}

/// Builds a save request with the given parameters.
pub fn reading_request(
    unit: &str,
    equipment: &str,
    date: &str,
    parameters: Value,
) -> SaveReadingRequest {
    SaveReadingRequest {
        unit: Some(unit.to_string()),
        equipment: Some(equipment.to_string()),
        date: Some(date.to_string()),
        parameters: Some(parameters),
        notes: None,
    }
}

pub fn single_parameter(id: &str, value: f64) -> Value {
    json!({ id: value })
}

/// Returns every audit entry recorded for `action`, newest first.
pub fn audit_entries(persistence: &mut Persistence, action: &str) -> Vec<AuditLogEntry> {
    persistence
        .list_audit_log(
            &AuditLogFilter {
                action: Some(action.to_string()),
                ..AuditLogFilter::default()
            },
            Pagination::new(1, 1000),
        )
        .unwrap()
        .items
}
