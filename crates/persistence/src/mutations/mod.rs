// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations for the persistence layer.
//!
//! ## Module Organization
//!
//! - `users`: Account creation and lifecycle updates
//! - `sessions`: Session creation and revocation
//! - `readings`: Reading upserts and deletes
//! - `audit`: Append-only audit log writes

pub mod audit;
pub mod readings;
pub mod sessions;
pub mod users;
