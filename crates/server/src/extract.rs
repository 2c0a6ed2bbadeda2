// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request extractors with JSON error bodies.

use axum::{
    Json,
    body::Bytes,
    extract::{ConnectInfo, FromRequest, FromRequestParts, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use std::convert::Infallible;
use std::net::SocketAddr;
use tracing::debug;

use crate::http_error::HttpError;

/// JSON body extractor that rejects malformed bodies with a 400 JSON error.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                debug!(error = %rejection.body_text(), "Rejected request body");
                Err(HttpError::bad_request(format!(
                    "Invalid JSON: {}",
                    rejection.body_text()
                )))
            }
        }
    }
}

/// JSON body extractor for endpoints whose body may be omitted.
///
/// An empty body yields `T::default()`.
pub struct OptionalJson<T>(pub T);

impl<S, T> FromRequest<S> for OptionalJson<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body: Bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| HttpError::bad_request(e.body_text()))?;

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(T::default()));
        }

        serde_json::from_slice::<T>(&body)
            .map(Self)
            .map_err(|e| HttpError::bad_request(format!("Invalid JSON: {e}")))
    }
}

/// Address of the calling client, when known.
///
/// Uses the first `X-Forwarded-For` entry, then the socket peer address.
pub struct ClientIp(pub Option<String>);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let forwarded: Option<String> = parts
            .headers
            .get("X-Forwarded-For")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        let peer: Option<String> = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());

        Ok(Self(forwarded.or(peer)))
    }
}
