use axum::{
    Json,
    extract::rejection::QueryRejection,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::domain::types::RecommendedGame;
use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::state::AppState;
use crate::usecase::recommendation::{GetRecommendationsUseCase, RecommendationOutput};
use crate::usecase::similarity::{PredictRatingUseCase, SimilarityMethod};

// ── GET /users/me/recommendations ────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct RecommendationQuery {
    #[serde(default, deserialize_with = "playnext_core::serde::lenient_bool")]
    pub force_generate: bool,
}

#[derive(Serialize)]
pub struct RecommendationResponse {
    pub structured_recommendations: Vec<RecommendedGame>,
    pub gemini_response: Option<String>,
    pub detail: Option<String>,
    #[serde(serialize_with = "playnext_core::serde::option_to_rfc3339_ms")]
    pub generated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub cached: bool,
}

impl From<RecommendationOutput> for RecommendationResponse {
    fn from(out: RecommendationOutput) -> Self {
        Self {
            structured_recommendations: out.items,
            gemini_response: out.raw_response,
            detail: out.detail,
            generated_at: out.generated_at,
            cached: out.cached,
        }
    }
}

pub async fn get_recommendations(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    query: Result<Query<RecommendationQuery>, QueryRejection>,
) -> Result<Json<RecommendationResponse>, ApiError> {
    let Query(query) = query?;
    let usecase = GetRecommendationsUseCase {
        ratings: state.rating_repo(),
        backlog: state.backlog_repo(),
        store: state.recommendation_store(),
        cache: state.recommendation_cache(),
        model: state.gemini.clone(),
        ttl_secs: state.recommendation_ttl_secs,
    };
    let out = usecase.execute(actor.id, query.force_generate).await?;
    Ok(Json(out.into()))
}

// ── GET /users/me/predictions/{game_id}?method= ──────────────────────────────

#[derive(Serialize)]
pub struct PredictionResponse {
    pub game_id: i32,
    pub predicted_rating: Option<f64>,
    pub similar_users: usize,
}

#[derive(Deserialize, Default)]
pub struct PredictionQuery {
    #[serde(default)]
    pub method: SimilarityMethod,
}

pub async fn get_prediction(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Path(game_id): Path<i32>,
    query: Result<Query<PredictionQuery>, QueryRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let Query(query) = query?;
    let usecase = PredictRatingUseCase {
        ratings: state.rating_repo(),
        games: state.game_repo(),
        method: query.method,
    };
    let out = usecase.execute(actor.id, game_id).await?;
    Ok(Json(PredictionResponse {
        game_id: out.game_id,
        predicted_rating: out.predicted_rating,
        similar_users: out.similar_users,
    }))
}
