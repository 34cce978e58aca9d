//! `Authorization: Bearer` extractor.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::response::{IntoResponse, Response};
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};
use http::HeaderMap;
use http::request::Parts;

use crate::token::{AuthError, validate_access_token};

/// HMAC secret used to sign and verify access tokens.
///
/// Router state must implement `FromRef` for this type to use [`BearerIdentity`].
#[derive(Clone)]
pub struct JwtSecret(pub Arc<str>);

impl JwtSecret {
    pub fn new(secret: impl Into<Arc<str>>) -> Self {
        Self(secret.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Why a request failed bearer authentication. Always rendered as 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    Missing,
    Expired,
    Invalid,
}

impl AuthRejection {
    pub fn detail(self) -> &'static str {
        match self {
            Self::Missing => "Not authenticated",
            Self::Expired => "Token has expired",
            Self::Invalid => "Invalid token",
        }
    }
}

impl From<AuthError> for AuthRejection {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Expired => Self::Expired,
            AuthError::InvalidSignature | AuthError::Malformed => Self::Invalid,
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        playnext_core::error::unauthorized_response("UNAUTHORIZED", self.detail())
    }
}

/// Subject carried by a valid bearer token.
///
/// Does not check that the user still exists; services resolve that themselves,
/// preferring `user_id` when the token has one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerIdentity {
    pub username: String,
    pub user_id: Option<i32>,
}

impl BearerIdentity {
    /// Validate the `Authorization: Bearer` header without going through axum.
    pub fn from_headers(headers: &HeaderMap, secret: &JwtSecret) -> Result<Self, AuthRejection> {
        let Some(Authorization(bearer)) = headers.typed_get::<Authorization<Bearer>>() else {
            return Err(AuthRejection::Missing);
        };
        validate_access_token(bearer.token(), secret.as_str())
            .map(|info| Self {
                username: info.username,
                user_id: info.user_id,
            })
            .map_err(|e| {
                tracing::debug!(error = %e, "bearer token rejected");
                AuthRejection::from(e)
            })
    }
}

impl<S> FromRequestParts<S> for BearerIdentity
where
    JwtSecret: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    // Extract synchronously and hand back a 'static future; axum-core 0.5 declares
    // this as `fn -> impl Future + Send`.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let result = Self::from_headers(&parts.headers, &JwtSecret::from_ref(state));
        async move { result }
    }
}
