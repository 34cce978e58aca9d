use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use playnext_domain::backlog::BacklogStatus;
use playnext_domain::pagination::PageRequest;

use crate::domain::types::BacklogItem;
use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::state::AppState;
use crate::usecase::backlog::{
    CreateBacklogItemInput, CreateBacklogItemUseCase, DeleteBacklogItemUseCase,
    GetBacklogItemUseCase, ListBacklogUseCase, UpdateBacklogItemInput, UpdateBacklogItemUseCase,
};

#[derive(Serialize)]
pub struct BacklogItemResponse {
    pub backlog_id: i32,
    pub user_id: i32,
    pub game_id: i32,
    pub status: BacklogStatus,
    pub rating: Option<f64>,
    #[serde(serialize_with = "playnext_core::serde::to_rfc3339_ms")]
    pub added_date: chrono::DateTime<chrono::Utc>,
}

impl From<BacklogItem> for BacklogItemResponse {
    fn from(item: BacklogItem) -> Self {
        Self {
            backlog_id: item.id,
            user_id: item.user_id,
            game_id: item.game_id,
            status: item.status,
            rating: item.score.map(|s| s.value()),
            added_date: item.added_date,
        }
    }
}

// ── POST /backlog ────────────────────────────────────────────────────────────

fn default_status() -> String {
    BacklogStatus::Planning.as_str().to_owned()
}

#[derive(Deserialize)]
pub struct CreateBacklogItemRequest {
    pub user_id: i32,
    pub game_id: i32,
    #[serde(default = "default_status")]
    pub status: String,
    pub rating: Option<f64>,
}

pub async fn create_backlog_item(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    body: Result<Json<CreateBacklogItemRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BacklogItemResponse>), ApiError> {
    let Json(body) = body?;
    let usecase = CreateBacklogItemUseCase {
        backlog: state.backlog_repo(),
        games: state.game_repo(),
    };
    let item = usecase
        .execute(
            &actor,
            CreateBacklogItemInput {
                user_id: body.user_id,
                game_id: body.game_id,
                status: body.status,
                rating: body.rating,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(item.into())))
}

// ── GET /backlog, GET /users/me/backlog ──────────────────────────────────────

pub async fn list_backlog(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    page: Result<Query<PageRequest>, QueryRejection>,
) -> Result<Json<Vec<BacklogItemResponse>>, ApiError> {
    let Query(page) = page?;
    let usecase = ListBacklogUseCase {
        repo: state.backlog_repo(),
    };
    let items = usecase.execute(actor.id, page).await?;
    Ok(Json(
        items.into_iter().map(BacklogItemResponse::from).collect(),
    ))
}

// ── /backlog/{id} ────────────────────────────────────────────────────────────

pub async fn get_backlog_item(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Path(item_id): Path<i32>,
) -> Result<Json<BacklogItemResponse>, ApiError> {
    let usecase = GetBacklogItemUseCase {
        repo: state.backlog_repo(),
    };
    Ok(Json(usecase.execute(&actor, item_id).await?.into()))
}

#[derive(Deserialize)]
pub struct UpdateBacklogItemRequest {
    pub status: Option<String>,
    pub rating: Option<f64>,
}

pub async fn update_backlog_item(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Path(item_id): Path<i32>,
    body: Result<Json<UpdateBacklogItemRequest>, JsonRejection>,
) -> Result<Json<BacklogItemResponse>, ApiError> {
    let Json(body) = body?;
    let usecase = UpdateBacklogItemUseCase {
        repo: state.backlog_repo(),
    };
    let item = usecase
        .execute(
            &actor,
            item_id,
            UpdateBacklogItemInput {
                status: body.status,
                rating: body.rating,
            },
        )
        .await?;
    Ok(Json(item.into()))
}

pub async fn delete_backlog_item(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Path(item_id): Path<i32>,
) -> Result<Json<BacklogItemResponse>, ApiError> {
    let usecase = DeleteBacklogItemUseCase {
        repo: state.backlog_repo(),
    };
    Ok(Json(usecase.execute(&actor, item_id).await?.into()))
}
