// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! HTTP error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;
use vibemon_api::ApiError;

/// Message returned for every 500 response.
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// User-facing error message.
    pub error: String,
    /// Individual validation failures, when there are several.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
    /// Set when the account exists but has not been approved yet.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub needs_approval: bool,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
pub struct HttpError {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error message.
    pub message: String,
    pub details: Vec<String>,
    pub needs_approval: bool,
}

impl HttpError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: Vec::new(),
            needs_approval: false,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: self.message,
            details: self.details,
            needs_approval: self.needs_approval,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::AuthenticationFailed { reason } => Self::unauthorized(reason),
            ApiError::Unauthorized { .. } => Self::new(StatusCode::FORBIDDEN, err.to_string()),
            ApiError::Forbidden { message } => Self::new(StatusCode::FORBIDDEN, message),
            ApiError::PendingApproval => Self {
                needs_approval: true,
                ..Self::new(StatusCode::FORBIDDEN, err.to_string())
            },
            ApiError::ValidationFailed { message, details } => Self {
                details,
                ..Self::bad_request(message)
            },
            ApiError::DomainRuleViolation { message, .. }
            | ApiError::InvalidInput { message, .. }
            | ApiError::PasswordPolicyViolation { message } => Self::bad_request(message),
            ApiError::ResourceNotFound { message, .. } => Self::not_found(message),
            ApiError::Internal { message } => {
                error!(error = %message, "Internal error");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
            }
        }
    }
}
