// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};
use vibemon_audit::Actor;
use vibemon_domain::{DomainError, Role};
use vibemon_persistence::{
    Persistence, SessionData, UserData, format_timestamp, parse_timestamp,
};

use crate::error::{ApiError, AuthError, translate_persistence_error};

/// A user whose bearer token has been validated.
///
/// The fields are a snapshot taken when the session was validated and are
/// used for authorization decisions and audit attribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The user's id.
    pub id: i64,
    /// The user's email address.
    pub email: String,
    /// The user's display name.
    pub name: String,
    /// The user's role.
    pub role: Role,
}

impl AuthenticatedUser {
    /// Builds the authenticated view of a stored user.
    #[must_use]
    pub fn from_user(user: &UserData) -> Self {
        Self {
            id: user.user_id,
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
        }
    }

    /// Converts this user into an audit actor.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::user(self.id, self.name.clone(), self.role)
    }
}

/// Authorization service for enforcing role-based access control.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that the user holds one of `allowed`.
    ///
    /// # Arguments
    ///
    /// * `user` - The authenticated user
    /// * `allowed` - The roles permitted to perform the action
    /// * `action` - The action being attempted, for error reporting
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unauthorized`] if the user's role is not allowed.
    pub fn require_role(
        user: &AuthenticatedUser,
        allowed: &[Role],
        action: &str,
    ) -> Result<(), AuthError> {
        if allowed.contains(&user.role) {
            return Ok(());
        }

        warn!(
            user_id = user.id,
            role = user.role.as_str(),
            action,
            "Role check failed"
        );
        Err(AuthError::Unauthorized {
            action: action.to_string(),
            required_role: allowed
                .iter()
                .map(Role::as_str)
                .collect::<Vec<&str>>()
                .join(" or "),
        })
    }
}

/// Authentication service for password login and session management.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Default session lifetime.
    pub const DEFAULT_SESSION_LIFETIME: Duration = Duration::days(7);

    const INVALID_CREDENTIALS: &'static str = "Invalid email or password";

    /// Verifies credentials and the account's lifecycle state.
    ///
    /// The password is checked before the account state, so a caller with
    /// a wrong password learns nothing about whether the account is active.
    ///
    /// # Errors
    ///
    /// Returns a 401 for unknown emails or wrong passwords, a 403 for
    /// deactivated or unapproved accounts, and an internal error if the
    /// database fails.
    pub fn authenticate(
        persistence: &mut Persistence,
        email: &str,
        password: &str,
    ) -> Result<UserData, ApiError> {
        let normalized: String = email.trim().to_lowercase();
        debug!(email = %normalized, "Authenticating user");

        let user: UserData = persistence
            .get_user_by_email(&normalized)
            .map_err(translate_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from(Self::INVALID_CREDENTIALS),
            })?;

        let valid: bool = Persistence::verify_password(password, &user.password_hash)
            .map_err(translate_persistence_error)?;
        if !valid {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from(Self::INVALID_CREDENTIALS),
            }
            .into());
        }

        user.account_state()
            .ensure_can_authenticate()
            .map_err(Self::account_error)?;

        Ok(user)
    }

    /// Authenticates a user and opens a session.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `email` - The login email (case-insensitive)
    /// * `password` - The plain-text password
    /// * `lifetime` - How long the session stays valid
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `user_data`)
    ///
    /// # Errors
    ///
    /// Returns an error if authentication fails or the session cannot be
    /// stored.
    pub fn login(
        persistence: &mut Persistence,
        email: &str,
        password: &str,
        lifetime: Duration,
    ) -> Result<(String, UserData), ApiError> {
        let user: UserData = Self::authenticate(persistence, email, password)?;

        let expires: OffsetDateTime = OffsetDateTime::now_utc()
            .checked_add(lifetime)
            .ok_or_else(|| ApiError::Internal {
                message: format!("session lifetime of {lifetime} is out of range"),
            })?;

        let session_token: String = Self::generate_session_token();
        let expires_at: String = format_timestamp(expires);

        persistence
            .create_session(&session_token, user.user_id, &expires_at)
            .map_err(translate_persistence_error)?;
        persistence
            .update_last_login(user.user_id)
            .map_err(translate_persistence_error)?;

        info!(user_id = user.user_id, "User logged in");
        Ok((session_token, user))
    }

    /// Validates a session token and returns the authenticated user.
    ///
    /// Expired sessions are deleted on sight. The account must still be
    /// active and approved.
    ///
    /// # Returns
    ///
    /// A tuple of (`authenticated_user`, `session_data`)
    ///
    /// # Errors
    ///
    /// Returns a 401 if the token is unknown or expired or its user no
    /// longer exists, and a 403 if the account is deactivated or pending.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<(AuthenticatedUser, SessionData), ApiError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(translate_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime =
            parse_timestamp(&session.expires_at).map_err(translate_persistence_error)?;
        if OffsetDateTime::now_utc() > expires_at {
            debug!(session_id = session.session_id, "Session expired");
            persistence
                .delete_session(session_token)
                .map_err(translate_persistence_error)?;
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            }
            .into());
        }

        let user: UserData = persistence
            .get_user_by_id(session.user_id)
            .map_err(translate_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("User not found"),
            })?;

        user.account_state()
            .ensure_can_authenticate()
            .map_err(Self::account_error)?;

        persistence
            .update_session_activity(session.session_id)
            .map_err(translate_persistence_error)?;

        Ok((AuthenticatedUser::from_user(&user), session))
    }

    /// Logs out by deleting the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be deleted.
    pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), ApiError> {
        persistence
            .delete_session(session_token)
            .map_err(translate_persistence_error)
    }

    /// Generates an opaque session token.
    fn generate_session_token() -> String {
        let timestamp: i128 = OffsetDateTime::now_utc().unix_timestamp_nanos();
        format!(
            "session_{timestamp}_{:016x}{:016x}",
            rand::random::<u64>(),
            rand::random::<u64>()
        )
    }

    /// Maps a lifecycle refusal to an authentication error.
    fn account_error(err: DomainError) -> AuthError {
        match err {
            DomainError::AccountPendingApproval => AuthError::PendingApproval,
            DomainError::AccountDeactivated => AuthError::AccountDeactivated,
            other => AuthError::AuthenticationFailed {
                reason: other.to_string(),
            },
        }
    }
}
