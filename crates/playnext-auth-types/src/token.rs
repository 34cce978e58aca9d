//! JWT access-token validation.

use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::Deserialize;
#[cfg(any(feature = "USE_ONLY_IN_TOKEN_ISSUER", test))]
use serde::Serialize;

/// Identity extracted from a validated access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub username: String,
    pub user_id: Option<i32>,
    pub exp: u64,
}

/// Errors returned by [`validate_access_token`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
}

/// JWT claims payload shared by token issuing and validation.
///
/// | Field | JWT claim | Meaning |
/// |-------|-----------|---------|
/// | `sub` | `sub` | username at issue time |
/// | `uid` | `uid` | user id; absent in tokens minted without one |
/// | `exp` | `exp` | expiration, seconds since epoch |
///
/// [`Serialize`] requires the **`USE_ONLY_IN_TOKEN_ISSUER`** cargo feature; only the
/// login flow mints tokens.
#[derive(Debug, Deserialize)]
#[cfg_attr(any(feature = "USE_ONLY_IN_TOKEN_ISSUER", test), derive(Serialize))]
pub struct JwtClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<i32>,
    pub exp: u64,
}

// ── Core decode (private) ────────────────────────────────────────────────

/// HS256, exp checked, required claims `exp` + `sub`. Leeway is zero so an
/// expired token is rejected at the second it expires.
fn decode_jwt(token: &str, secret: &str) -> Result<JwtClaims, AuthError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        _ => AuthError::Malformed,
    })?;

    Ok(data.claims)
}

// ── Public ───────────────────────────────────────────────────────────────

/// Validate a bearer access token, returning the username it was issued for.
pub fn validate_access_token(token: &str, secret: &str) -> Result<TokenInfo, AuthError> {
    let claims = decode_jwt(token, secret)?;
    if claims.sub.is_empty() {
        return Err(AuthError::Malformed);
    }
    Ok(TokenInfo {
        username: claims.sub,
        user_id: claims.uid,
        exp: claims.exp,
    })
}
