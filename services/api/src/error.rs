use axum::extract::rejection::{FormRejection, JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use playnext_auth_types::identity::AuthRejection;
use playnext_core::error::{error_response, unauthorized_response};

pub const ADMIN_REQUIRED: &str =
    "Not authorized to access this resource. Admin privileges required.";

/// API service error variants. `Display` is the `detail` clients see.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Incorrect username or password")]
    IncorrectCredentials,
    #[error("Username already registered")]
    UsernameTaken,
    #[error("Email already registered")]
    EmailTaken,
    #[error("Game already registered")]
    GameAlreadyRegistered,
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("User not found")]
    UserNotFound,
    #[error("Game not found")]
    GameNotFound,
    #[error("Rating not found")]
    RatingNotFound,
    #[error("Backlog item not found")]
    BacklogItemNotFound,
    #[error("Game not found on IGDB")]
    NotFoundOnIgdb,
    #[error("No games found locally or on IGDB")]
    NoGamesFound,
    #[error("You have already rated this game. Consider updating your existing rating.")]
    RatingAlreadyExists,
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Upstream(String),
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::IncorrectCredentials => "INCORRECT_CREDENTIALS",
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::GameAlreadyRegistered => "GAME_ALREADY_REGISTERED",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::GameNotFound => "GAME_NOT_FOUND",
            Self::RatingNotFound => "RATING_NOT_FOUND",
            Self::BacklogItemNotFound => "BACKLOG_ITEM_NOT_FOUND",
            Self::NotFoundOnIgdb => "NOT_FOUND_ON_IGDB",
            Self::NoGamesFound => "NO_GAMES_FOUND",
            Self::RatingAlreadyExists => "RATING_ALREADY_EXISTS",
            Self::Validation(_) => "VALIDATION",
            Self::Upstream(_) => "UPSTREAM",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::IncorrectCredentials
            | Self::UsernameTaken
            | Self::EmailTaken
            | Self::GameAlreadyRegistered => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::UserNotFound
            | Self::GameNotFound
            | Self::RatingNotFound
            | Self::BacklogItemNotFound
            | Self::NotFoundOnIgdb
            | Self::NoGamesFound => StatusCode::NOT_FOUND,
            Self::RatingAlreadyExists => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AuthRejection> for ApiError {
    fn from(rejection: AuthRejection) -> Self {
        Self::Unauthorized(rejection.detail())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Internal(e) => {
                tracing::error!(error = %e, kind = "INTERNAL", "internal error");
            }
            Self::Upstream(detail) => {
                tracing::warn!(detail = %detail, kind = "UPSTREAM", "upstream failure");
            }
            _ => {}
        }
        if let Self::Unauthorized(detail) = self {
            return unauthorized_response(self.kind(), detail);
        }
        error_response(self.status(), self.kind(), self.to_string())
    }
}
