// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session extraction for authenticated routes.
//!
//! This module provides the Axum extractor that validates bearer tokens
//! and enforces authentication at the server boundary.

use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::{debug, warn};
use vibemon_api::{AuthenticatedUser, AuthenticationService};

use crate::AppState;
use crate::http_error::HttpError;

/// Extractor for authenticated users.
///
/// Validates the session token from the Authorization header and returns
/// the authenticated user together with the raw token.
///
/// # Usage
///
/// ```ignore
/// async fn my_handler(
///     SessionUser(user, token): SessionUser,
/// ) -> Result<Json<Response>, HttpError> {
///     // user: AuthenticatedUser
///     // token: String
///     Ok(Json(Response { ... }))
/// }
/// ```
///
/// # Authentication Flow
///
/// 1. Extract `Authorization: Bearer <token>` header
/// 2. Validate the token via `AuthenticationService::validate_session`
/// 3. Reject expired sessions and deactivated or unapproved accounts
/// 4. Return the `AuthenticatedUser` with its current role
///
/// # Errors
///
/// Returns HTTP 401 if the header is missing or malformed, or the session
/// is unknown or expired. Returns HTTP 403 if the account is deactivated
/// or still pending approval.
pub struct SessionUser(pub AuthenticatedUser, pub String);

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = HttpError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header: &str = parts
            .headers
            .get("Authorization")
            .ok_or_else(|| {
                debug!("Missing Authorization header");
                HttpError::unauthorized("Access token required")
            })?
            .to_str()
            .map_err(|_| {
                warn!("Invalid Authorization header encoding");
                HttpError::unauthorized("Invalid Authorization header")
            })?;

        let token: &str = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                warn!("Authorization header does not carry a bearer token");
                HttpError::unauthorized("Access token required")
            })?;

        let mut persistence = state.persistence.lock().await;
        let (user, _session) = AuthenticationService::validate_session(&mut persistence, token)
            .map_err(|e| {
                warn!(error = %e, "Session validation failed");
                HttpError::from(e)
            })?;
        drop(persistence);

        debug!(
            user_id = user.id,
            role = user.role.as_str(),
            "Session validated successfully"
        );

        Ok(Self(user, token.to_string()))
    }
}
