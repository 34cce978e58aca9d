use axum::{Form, Json, extract::State, extract::rejection::FormRejection};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::token::{LoginInput, LoginUseCase};

// ── POST /auth/token ─────────────────────────────────────────────────────────

/// OAuth2 password-grant form fields; other fields are ignored.
#[derive(Deserialize)]
pub struct TokenForm {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

pub async fn create_token(
    State(state): State<AppState>,
    form: Result<Form<TokenForm>, FormRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Form(form) = form?;
    let usecase = LoginUseCase {
        users: state.user_repo(),
        hasher: state.hasher,
        jwt_secret: state.jwt_secret.as_str().to_owned(),
        token_ttl_minutes: state.access_token_expire_minutes,
    };
    let out = usecase
        .execute(LoginInput {
            username: form.username,
            password: form.password,
        })
        .await?;
    Ok(Json(TokenResponse {
        access_token: out.access_token,
        token_type: out.token_type,
    }))
}
