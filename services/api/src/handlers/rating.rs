use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use playnext_domain::pagination::PageRequest;

use crate::domain::types::{RatedGame, Rating, User};
use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::handlers::game::GameResponse;
use crate::state::AppState;
use crate::usecase::rating::{
    CreateRatingInput, CreateRatingUseCase, DeleteRatingUseCase, GetRatingUseCase,
    ListRatingsUseCase, ListUserRatingsUseCase, UpdateRatingInput, UpdateRatingUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct RatingResponse {
    pub rating_id: i32,
    pub user_id: i32,
    pub game_id: i32,
    pub rating: f64,
    pub comment: Option<String>,
    #[serde(serialize_with = "playnext_core::serde::to_rfc3339_ms")]
    pub rating_date: DateTime<Utc>,
    #[serde(serialize_with = "playnext_core::serde::option_to_rfc3339_ms")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Rating> for RatingResponse {
    fn from(rating: Rating) -> Self {
        Self {
            rating_id: rating.id,
            user_id: rating.user_id,
            game_id: rating.game_id,
            rating: rating.score.value(),
            comment: rating.comment,
            rating_date: rating.rating_date,
            updated_at: rating.updated_at,
        }
    }
}

/// A rating with its game embedded, for the caller's own listing.
#[derive(Serialize)]
pub struct RatedGameResponse {
    #[serde(flatten)]
    pub rating: RatingResponse,
    pub game: GameResponse,
}

impl From<RatedGame> for RatedGameResponse {
    fn from(entry: RatedGame) -> Self {
        Self {
            rating: entry.rating.into(),
            game: entry.game.into(),
        }
    }
}

// ── POST /ratings, POST /users/me/ratings ────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateRatingRequest {
    pub user_id: Option<i32>,
    pub game_id: i32,
    pub rating: f64,
    pub comment: Option<String>,
    pub rating_date: Option<DateTime<Utc>>,
}

async fn create(
    actor: &User,
    state: &AppState,
    body: CreateRatingRequest,
) -> Result<(StatusCode, Json<RatingResponse>), ApiError> {
    let usecase = CreateRatingUseCase {
        ratings: state.rating_repo(),
        games: state.game_repo(),
    };
    let rating = usecase
        .execute(
            actor,
            CreateRatingInput {
                user_id: body.user_id,
                game_id: body.game_id,
                rating: body.rating,
                comment: body.comment,
                rating_date: body.rating_date,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(rating.into())))
}

pub async fn create_rating(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    body: Result<Json<CreateRatingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RatingResponse>), ApiError> {
    let Json(body) = body?;
    create(&actor, &state, body).await
}

/// Same as [`create_rating`] with the owner implied by the token.
pub async fn create_my_rating(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    body: Result<Json<CreateRatingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RatingResponse>), ApiError> {
    let Json(mut body) = body?;
    body.user_id = None;
    create(&actor, &state, body).await
}

// ── GET /ratings ─────────────────────────────────────────────────────────────

pub async fn list_ratings(
    _user: CurrentUser,
    State(state): State<AppState>,
    page: Result<Query<PageRequest>, QueryRejection>,
) -> Result<Json<Vec<RatingResponse>>, ApiError> {
    let Query(page) = page?;
    let usecase = ListRatingsUseCase {
        repo: state.rating_repo(),
    };
    let ratings = usecase.execute(page).await?;
    Ok(Json(ratings.into_iter().map(RatingResponse::from).collect()))
}

// ── GET /users/me/ratings ────────────────────────────────────────────────────

pub async fn list_my_ratings(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<RatedGameResponse>>, ApiError> {
    let usecase = ListUserRatingsUseCase {
        repo: state.rating_repo(),
    };
    let ratings = usecase.execute(actor.id).await?;
    Ok(Json(
        ratings.into_iter().map(RatedGameResponse::from).collect(),
    ))
}

// ── /ratings/{id} ────────────────────────────────────────────────────────────

pub async fn get_rating(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Path(rating_id): Path<i32>,
) -> Result<Json<RatingResponse>, ApiError> {
    let usecase = GetRatingUseCase {
        repo: state.rating_repo(),
    };
    Ok(Json(usecase.execute(&actor, rating_id).await?.into()))
}

#[derive(Deserialize)]
pub struct UpdateRatingRequest {
    pub rating: Option<f64>,
    pub comment: Option<String>,
}

pub async fn update_rating(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Path(rating_id): Path<i32>,
    body: Result<Json<UpdateRatingRequest>, JsonRejection>,
) -> Result<Json<RatingResponse>, ApiError> {
    let Json(body) = body?;
    let usecase = UpdateRatingUseCase {
        repo: state.rating_repo(),
    };
    let rating = usecase
        .execute(
            &actor,
            rating_id,
            UpdateRatingInput {
                rating: body.rating,
                comment: body.comment,
            },
        )
        .await?;
    Ok(Json(rating.into()))
}

pub async fn delete_rating(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Path(rating_id): Path<i32>,
) -> Result<Json<RatingResponse>, ApiError> {
    let usecase = DeleteRatingUseCase {
        repo: state.rating_repo(),
    };
    Ok(Json(usecase.execute(&actor, rating_id).await?.into()))
}
