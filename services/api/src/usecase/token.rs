use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{EncodingKey, Header, encode};

use playnext_auth_types::token::JwtClaims;

use crate::domain::repository::{PasswordHasher, UserRepository};
use crate::error::ApiError;

pub const TOKEN_TYPE: &str = "bearer";

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Sign an HS256 access token for a user. Returns the token and its `exp`.
pub fn issue_access_token(
    username: &str,
    user_id: i32,
    secret: &str,
    ttl_minutes: u64,
) -> Result<(String, u64), ApiError> {
    let exp = now_secs() + ttl_minutes * 60;
    let claims = JwtClaims {
        sub: username.to_owned(),
        uid: Some(user_id),
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(e.into()))?;
    Ok((token, exp))
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub username: String,
    pub password: String,
}

#[derive(Debug)]
pub struct LoginOutput {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_at: u64,
}

pub struct LoginUseCase<U: UserRepository, H: PasswordHasher> {
    pub users: U,
    pub hasher: H,
    pub jwt_secret: String,
    pub token_ttl_minutes: u64,
}

impl<U: UserRepository, H: PasswordHasher> LoginUseCase<U, H> {
    /// Unknown user and wrong password both yield [`ApiError::IncorrectCredentials`].
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, ApiError> {
        let user = self
            .users
            .find_by_username(&input.username)
            .await?
            .ok_or(ApiError::IncorrectCredentials)?;

        if !self
            .hasher
            .verify(&input.password, &user.password_hash)
            .await?
        {
            return Err(ApiError::IncorrectCredentials);
        }

        let (access_token, expires_at) =
            issue_access_token(
            &user.username,
            user.id,
            &self.jwt_secret,
            self.token_ttl_minutes,
        )?;
        tracing::info!(user_id = user.id, "access token issued");
        Ok(LoginOutput {
            access_token,
            token_type: TOKEN_TYPE,
            expires_at,
        })
    }
}
