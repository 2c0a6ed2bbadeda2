// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod initialization_tests;
mod session_tests;

use std::collections::BTreeMap;
use time::Date;
use vibemon_domain::{Reading, Role, Unit};

use crate::{NewUser, Persistence};

pub const TEST_PASSWORD: &str = "Secret123";

/// Creates a user and returns its ID.
pub fn create_test_user(
    persistence: &mut Persistence,
    email: &str,
    role: Role,
    is_approved: bool,
) -> i64 {
    persistence
        .create_user(NewUser {
            email,
            name: "Test User",
            password: TEST_PASSWORD,
            role,
            is_approved,
        })
        .expect("create test user")
}

pub fn test_date(day: u8) -> Date {
    Date::from_calendar_date(2026, time::Month::March, day).expect("Valid test date")
}

/// Builds a reading recorded by `created_by`.
pub fn create_test_reading(
    unit: Unit,
    equipment: &str,
    date: Date,
    created_by: i64,
    parameters: &[(&str, f64)],
) -> Reading {
    Reading {
        unit,
        equipment: equipment.to_string(),
        date,
        parameters: parameters
            .iter()
            .map(|(id, value)| ((*id).to_string(), *value))
            .collect::<BTreeMap<String, f64>>(),
        notes: String::new(),
        created_by,
        created_by_name: String::from("Test User"),
        recorded_at: crate::now_timestamp(),
    }
}
