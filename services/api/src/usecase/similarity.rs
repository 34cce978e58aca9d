//! User-based collaborative filtering over `user → (game → score)` maps.

use std::collections::{HashMap, HashSet};

use playnext_domain::score::{MAX_SCORE, MIN_SCORE};
use serde::Deserialize;

use crate::domain::repository::{GameRepository, RatingRepository};
use crate::domain::types::ScoreEntry;
use crate::error::ApiError;

/// `user_id → (game_id → score)`.
pub type UserRatings = HashMap<i32, HashMap<i32, f64>>;

/// `(user, other) → similarity`.
pub type PairSimilarities = HashMap<(i32, i32), f64>;

pub type SimilarityFn = fn(&HashMap<i32, f64>, &HashMap<i32, f64>) -> f64;

/// Similarity measure used to find neighbours; Pearson unless asked otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityMethod {
    #[default]
    Pearson,
    Cosine,
}

impl SimilarityMethod {
    pub fn function(self) -> SimilarityFn {
        match self {
            Self::Pearson => pearson_correlation,
            Self::Cosine => cosine_similarity,
        }
    }
}

pub fn user_ratings_from(entries: &[ScoreEntry]) -> UserRatings {
    let mut matrix = UserRatings::new();
    for e in entries {
        matrix.entry(e.user_id).or_default().insert(e.game_id, e.score);
    }
    matrix
}

fn common_keys<'a>(a: &'a HashMap<i32, f64>, b: &HashMap<i32, f64>) -> Vec<&'a i32> {
    a.keys().filter(|k| b.contains_key(k)).collect()
}

/// Cosine similarity over co-rated keys; 0.0 without overlap or with a zero vector.
pub fn cosine_similarity(a: &HashMap<i32, f64>, b: &HashMap<i32, f64>) -> f64 {
    let common = common_keys(a, b);
    if common.is_empty() {
        return 0.0;
    }
    let dot: f64 = common.iter().map(|k| a[k] * b[k]).sum();
    let mag_a = common.iter().map(|k| a[k].powi(2)).sum::<f64>().sqrt();
    let mag_b = common.iter().map(|k| b[k].powi(2)).sum::<f64>().sqrt();
    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }
    dot / (mag_a * mag_b)
}

/// Pearson correlation over co-rated keys; 0.0 without overlap or variance.
pub fn pearson_correlation(a: &HashMap<i32, f64>, b: &HashMap<i32, f64>) -> f64 {
    let common = common_keys(a, b);
    if common.is_empty() {
        return 0.0;
    }
    let n = common.len() as f64;
    let avg_a = common.iter().map(|k| a[k]).sum::<f64>() / n;
    let avg_b = common.iter().map(|k| b[k]).sum::<f64>() / n;

    let numerator: f64 = common
        .iter()
        .map(|k| (a[k] - avg_a) * (b[k] - avg_b))
        .sum();
    let den_a = common
        .iter()
        .map(|k| (a[k] - avg_a).powi(2))
        .sum::<f64>()
        .sqrt();
    let den_b = common
        .iter()
        .map(|k| (b[k] - avg_b).powi(2))
        .sum::<f64>()
        .sqrt();
    if den_a == 0.0 || den_b == 0.0 {
        return 0.0;
    }
    numerator / (den_a * den_b)
}

/// Similarity between one user and every other user.
pub fn similarities_for_user(
    user_id: i32,
    ratings: &UserRatings,
    similarity: SimilarityFn,
) -> PairSimilarities {
    let Some(own) = ratings.get(&user_id) else {
        return PairSimilarities::new();
    };
    ratings
        .iter()
        .filter(|(other, _)| **other != user_id)
        .map(|(&other, theirs)| ((user_id, other), similarity(own, theirs)))
        .collect()
}

/// Similarity-weighted average of other users' scores for `game_id`.
/// Returns 0.0 when no similar user rated it.
pub fn predict_rating(
    user_id: i32,
    game_id: i32,
    ratings: &UserRatings,
    similarities: &PairSimilarities,
) -> f64 {
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    let mut seen = HashSet::new();
    for (&(a, b), &s) in similarities {
        if a != user_id || b == user_id || !seen.insert(b) {
            continue;
        }
        if let Some(score) = ratings.get(&b).and_then(|r| r.get(&game_id)) {
            numerator += s * score;
            denominator += s.abs();
        }
    }
    if denominator == 0.0 {
        return 0.0;
    }
    numerator / denominator
}

// ── PredictRating ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionOutput {
    pub game_id: i32,
    /// `None` when no similar user has rated the game.
    pub predicted_rating: Option<f64>,
    pub similar_users: usize,
}

pub struct PredictRatingUseCase<R: RatingRepository, G: GameRepository> {
    pub ratings: R,
    pub games: G,
    pub method: SimilarityMethod,
}

impl<R: RatingRepository, G: GameRepository> PredictRatingUseCase<R, G> {
    pub async fn execute(&self, user_id: i32, game_id: i32) -> Result<PredictionOutput, ApiError> {
        if self.games.find_by_id(game_id).await?.is_none() {
            return Err(ApiError::GameNotFound);
        }
        let matrix = user_ratings_from(&self.ratings.list_scores().await?);
        let similarities = similarities_for_user(user_id, &matrix, self.method.function());
        let similar_users = similarities
            .iter()
            .filter(|((_, other), s)| {
                **s != 0.0 && matrix.get(other).is_some_and(|r| r.contains_key(&game_id))
            })
            .count();

        let raw = predict_rating(user_id, game_id, &matrix, &similarities);
        let predicted_rating = (similar_users > 0 && raw != 0.0)
            .then(|| raw.clamp(MIN_SCORE, MAX_SCORE));
        tracing::debug!(
            user_id,
            game_id,
            method = ?self.method,
            similar_users,
            raw,
            "rating predicted"
        );
        Ok(PredictionOutput {
            game_id,
            predicted_rating,
            similar_users,
        })
    }
}
