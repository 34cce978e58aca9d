use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use playnext_domain::pagination::PageRequest;

use crate::domain::types::User;
use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::state::AppState;
use crate::usecase::user::{
    DeleteUserUseCase, GetUserUseCase, ListUsersUseCase, RegisterUserInput, RegisterUserUseCase,
    UpdateUserInput, UpdateUserUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct UserResponse {
    pub user_id: i32,
    pub username: String,
    pub email: String,
    pub user_age: Option<i32>,
    pub is_admin: bool,
    #[serde(serialize_with = "playnext_core::serde::to_rfc3339_ms")]
    pub registration_date: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
            email: user.email,
            user_age: user.user_age,
            is_admin: user.is_admin,
            registration_date: user.registration_date,
        }
    }
}

// ── POST /users ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub user_age: Option<i32>,
}

pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let Json(body) = body?;
    let usecase = RegisterUserUseCase {
        users: state.user_repo(),
        hasher: state.hasher,
    };
    let user = usecase
        .execute(RegisterUserInput {
            username: body.username,
            email: body.email,
            password: body.password,
            user_age: body.user_age,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

// ── GET /users ───────────────────────────────────────────────────────────────

pub async fn list_users(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    page: Result<Query<PageRequest>, QueryRejection>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let Query(page) = page?;
    let usecase = ListUsersUseCase {
        repo: state.user_repo(),
    };
    let users = usecase.execute(&actor, page).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

// ── /users/me ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub user_age: Option<i32>,
}

impl From<UpdateUserRequest> for UpdateUserInput {
    fn from(body: UpdateUserRequest) -> Self {
        Self {
            username: body.username,
            email: body.email,
            password: body.password,
            user_age: body.user_age,
        }
    }
}

pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(user.into())
}

pub async fn update_me(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    body: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let Json(body) = body?;
    let usecase = UpdateUserUseCase {
        users: state.user_repo(),
        hasher: state.hasher,
    };
    let user = usecase.execute(&actor, actor.id, body.into()).await?;
    Ok(Json(user.into()))
}

pub async fn delete_me(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    let usecase = DeleteUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase.execute(&actor, actor.id).await?;
    Ok(Json(user.into()))
}

// ── /users/{id} ──────────────────────────────────────────────────────────────

pub async fn get_user(
    _user: CurrentUser,
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<Json<UserResponse>, ApiError> {
    let usecase = GetUserUseCase {
        repo: state.user_repo(),
    };
    Ok(Json(usecase.execute(user_id).await?.into()))
}

pub async fn update_user(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    body: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let Json(body) = body?;
    let usecase = UpdateUserUseCase {
        users: state.user_repo(),
        hasher: state.hasher,
    };
    let user = usecase.execute(&actor, user_id, body.into()).await?;
    Ok(Json(user.into()))
}

pub async fn delete_user(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<Json<UserResponse>, ApiError> {
    let usecase = DeleteUserUseCase {
        repo: state.user_repo(),
    };
    Ok(Json(usecase.execute(&actor, user_id).await?.into()))
}
