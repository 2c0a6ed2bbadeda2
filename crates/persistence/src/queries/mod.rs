// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `users`: Account lookups, lists and counts
//! - `sessions`: Session lookups
//! - `readings`: Reading lookups, filtered pages and counts
//! - `audit`: Audit log pages and recent activity

pub mod audit;
pub mod readings;
pub mod sessions;
pub mod users;
