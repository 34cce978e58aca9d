use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Path, Query, RawQuery, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use playnext_domain::game::GameSortBy;
use playnext_domain::pagination::PageRequest;

use crate::domain::types::{Game, GameChanges, GameFilter, GameRating};
use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::state::AppState;
use crate::usecase::game::{
    DeleteGameUseCase, GetGameUseCase, ImportGameUseCase, ListGamesUseCase, SearchGamesUseCase,
    UpdateGameUseCase,
};
use crate::usecase::rating::ListGameRatingsUseCase;

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct GameResponse {
    pub game_id: i32,
    pub game_name: String,
    pub genre: String,
    pub platform: String,
    pub release_date: NaiveDate,
    pub image_url: String,
    pub igdb_id: Option<i64>,
    pub age_rating: String,
    pub igdb_link: String,
}

impl From<Game> for GameResponse {
    fn from(game: Game) -> Self {
        Self {
            game_id: game.id,
            game_name: game.name,
            genre: game.genre,
            platform: game.platform,
            release_date: game.release_date,
            image_url: game.image_url,
            igdb_id: game.igdb_id,
            age_rating: game.age_rating,
            igdb_link: game.igdb_link,
        }
    }
}

#[derive(Serialize)]
pub struct RatingAuthor {
    pub user_id: i32,
    pub username: String,
}

#[derive(Serialize)]
pub struct RatedGameSummary {
    pub game_id: i32,
    pub game_name: String,
    pub image_url: String,
}

#[derive(Serialize)]
pub struct GameRatingResponse {
    pub rating_id: i32,
    pub rating: f64,
    pub comment: Option<String>,
    #[serde(serialize_with = "playnext_core::serde::to_rfc3339_ms")]
    pub rating_date: chrono::DateTime<chrono::Utc>,
    pub user: RatingAuthor,
    pub game: RatedGameSummary,
}

impl From<GameRating> for GameRatingResponse {
    fn from(entry: GameRating) -> Self {
        Self {
            rating_id: entry.rating.id,
            rating: entry.rating.score.value(),
            comment: entry.rating.comment,
            rating_date: entry.rating.rating_date,
            user: RatingAuthor {
                user_id: entry.rating.user_id,
                username: entry.username,
            },
            game: RatedGameSummary {
                game_id: entry.game.id,
                game_name: entry.game.name,
                image_url: entry.game.image_url,
            },
        }
    }
}

// ── GET /games ───────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct GameListQuery {
    pub skip: Option<u64>,
    pub limit: Option<u64>,
    pub sort_by: Option<String>,
    pub genre: Option<String>,
    pub platform: Option<String>,
}

pub async fn list_games(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<GameResponse>>, ApiError> {
    let query: GameListQuery = raw_query
        .as_deref()
        .map(serde_qs::from_str)
        .transpose()
        .map_err(|e| ApiError::Validation(e.to_string()))?
        .unwrap_or_default();

    // Unknown sort columns fall back to the default order.
    let sort_by = query
        .sort_by
        .as_deref()
        .and_then(|s| s.parse::<GameSortBy>().ok())
        .unwrap_or_default();
    let default_page = PageRequest::default();
    let page = PageRequest::new(
        query.skip.unwrap_or(default_page.skip),
        query.limit.unwrap_or(default_page.limit),
    );
    let filter = GameFilter {
        genre: query.genre.filter(|s| !s.is_empty()),
        platform: query.platform.filter(|s| !s.is_empty()),
    };

    let usecase = ListGamesUseCase {
        repo: state.game_repo(),
    };
    let games = usecase.execute(filter, sort_by, page).await?;
    Ok(Json(games.into_iter().map(GameResponse::from).collect()))
}

// ── POST /games?title= ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ImportGameQuery {
    pub title: String,
}

pub async fn create_game(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    query: Result<Query<ImportGameQuery>, QueryRejection>,
) -> Result<(StatusCode, Json<GameResponse>), ApiError> {
    let Query(query) = query?;
    let usecase = ImportGameUseCase {
        games: state.game_repo(),
        catalog: state.igdb.clone(),
    };
    let game = usecase.execute(&actor, &query.title).await?;
    Ok((StatusCode::CREATED, Json(game.into())))
}

// ── /games/{id} ──────────────────────────────────────────────────────────────

pub async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<i32>,
) -> Result<Json<GameResponse>, ApiError> {
    let usecase = GetGameUseCase {
        repo: state.game_repo(),
    };
    Ok(Json(usecase.execute(game_id).await?.into()))
}

#[derive(Deserialize)]
pub struct UpdateGameRequest {
    pub game_name: Option<String>,
    pub genre: Option<String>,
    pub platform: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub image_url: Option<String>,
    pub age_rating: Option<String>,
    pub igdb_link: Option<String>,
}

pub async fn update_game(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Path(game_id): Path<i32>,
    body: Result<Json<UpdateGameRequest>, JsonRejection>,
) -> Result<Json<GameResponse>, ApiError> {
    let Json(body) = body?;
    let usecase = UpdateGameUseCase {
        repo: state.game_repo(),
    };
    let changes = GameChanges {
        name: body.game_name,
        genre: body.genre,
        platform: body.platform,
        release_date: body.release_date,
        image_url: body.image_url,
        age_rating: body.age_rating,
        igdb_link: body.igdb_link,
    };
    Ok(Json(usecase.execute(&actor, game_id, changes).await?.into()))
}

pub async fn delete_game(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Path(game_id): Path<i32>,
) -> Result<Json<GameResponse>, ApiError> {
    let usecase = DeleteGameUseCase {
        repo: state.game_repo(),
    };
    Ok(Json(usecase.execute(&actor, game_id).await?.into()))
}

// ── GET /games/{id}/ratings ──────────────────────────────────────────────────

pub async fn list_game_ratings(
    State(state): State<AppState>,
    Path(game_id): Path<i32>,
) -> Result<Json<Vec<GameRatingResponse>>, ApiError> {
    let usecase = ListGameRatingsUseCase {
        ratings: state.rating_repo(),
        games: state.game_repo(),
    };
    let ratings = usecase.execute(game_id).await?;
    Ok(Json(
        ratings.into_iter().map(GameRatingResponse::from).collect(),
    ))
}

// ── GET /games/search/{query} ────────────────────────────────────────────────

pub async fn search_games(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> Result<Json<Vec<GameResponse>>, ApiError> {
    let usecase = SearchGamesUseCase {
        games: state.game_repo(),
        catalog: state.igdb.clone(),
    };
    let games = usecase.execute(&query).await?;
    Ok(Json(games.into_iter().map(GameResponse::from).collect()))
}
