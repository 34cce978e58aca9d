//! Mock auth helpers for integration tests.
//!
//! Mints HS256 bearer tokens with the same claim shape the login flow issues,
//! so tests can authenticate without going through `POST /token`.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::http::{HeaderName, HeaderValue, header};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::json;

/// Identity and signing secret used to mint test tokens.
pub struct MockAuth {
    pub username: String,
    pub secret: String,
}

impl MockAuth {
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
        }
    }

    fn now_secs() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }

    fn sign(&self, secret: &str, exp: u64) -> String {
        encode(
            &Header::default(),
            &json!({ "sub": self.username, "exp": exp }),
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("test token encodes")
    }

    /// Token valid for the next hour.
    pub fn token(&self) -> String {
        self.sign(&self.secret, Self::now_secs() + 3600)
    }

    /// Token whose `exp` is an hour in the past.
    pub fn expired_token(&self) -> String {
        self.sign(&self.secret, Self::now_secs().saturating_sub(3600))
    }

    /// Token signed with a secret the service does not know.
    pub fn forged_token(&self) -> String {
        self.sign("not-the-service-secret", Self::now_secs() + 3600)
    }

    /// `Authorization` header carrying [`MockAuth::token`].
    pub fn header(&self) -> (HeaderName, HeaderValue) {
        bearer(&self.token())
    }
}

/// Build an `Authorization: Bearer <token>` header pair.
pub fn bearer(token: &str) -> (HeaderName, HeaderValue) {
    let value = HeaderValue::from_str(&format!("Bearer {token}")).expect("token is header-safe");
    (header::AUTHORIZATION, value)
}
