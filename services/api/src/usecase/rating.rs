use chrono::{DateTime, Utc};

use playnext_domain::pagination::PageRequest;
use playnext_domain::score::Score;

use crate::domain::repository::{GameRepository, RatingRepository};
use crate::domain::types::{GameRating, NewRating, RatedGame, Rating, RatingChanges, User};
use crate::error::ApiError;

pub(crate) fn parse_score(value: f64) -> Result<Score, ApiError> {
    Score::new(value).map_err(|e| ApiError::Validation(e.to_string()))
}

/// Load a rating and check the caller owns it. Missing wins over foreign.
async fn owned_rating<R: RatingRepository>(
    repo: &R,
    actor: &User,
    rating_id: i32,
    denied: &'static str,
) -> Result<Rating, ApiError> {
    let rating = repo
        .find_by_id(rating_id)
        .await?
        .ok_or(ApiError::RatingNotFound)?;
    if rating.user_id != actor.id {
        return Err(ApiError::Forbidden(denied));
    }
    Ok(rating)
}

// ── CreateRating ─────────────────────────────────────────────────────────────

pub struct CreateRatingInput {
    /// Owner named in the body; `None` means the caller.
    pub user_id: Option<i32>,
    pub game_id: i32,
    pub rating: f64,
    pub comment: Option<String>,
    pub rating_date: Option<DateTime<Utc>>,
}

pub struct CreateRatingUseCase<R: RatingRepository, G: GameRepository> {
    pub ratings: R,
    pub games: G,
}

impl<R: RatingRepository, G: GameRepository> CreateRatingUseCase<R, G> {
    pub async fn execute(&self, actor: &User, input: CreateRatingInput) -> Result<Rating, ApiError> {
        if input.user_id.is_some_and(|id| id != actor.id) {
            return Err(ApiError::Forbidden("Cannot create rating for another user."));
        }
        let score = parse_score(input.rating)?;

        if self.games.find_by_id(input.game_id).await?.is_none() {
            return Err(ApiError::GameNotFound);
        }
        if self
            .ratings
            .find_by_user_and_game(actor.id, input.game_id)
            .await?
            .is_some()
        {
            return Err(ApiError::RatingAlreadyExists);
        }

        self.ratings
            .create(&NewRating {
                user_id: actor.id,
                game_id: input.game_id,
                score,
                comment: input.comment,
                rating_date: input.rating_date.unwrap_or_else(Utc::now),
            })
            .await
    }
}

// ── GetRating ────────────────────────────────────────────────────────────────

pub struct GetRatingUseCase<R: RatingRepository> {
    pub repo: R,
}

impl<R: RatingRepository> GetRatingUseCase<R> {
    pub async fn execute(&self, actor: &User, rating_id: i32) -> Result<Rating, ApiError> {
        owned_rating(
            &self.repo,
            actor,
            rating_id,
            "Not authorized to access this rating",
        )
        .await
    }
}

// ── ListRatings ──────────────────────────────────────────────────────────────

pub struct ListRatingsUseCase<R: RatingRepository> {
    pub repo: R,
}

impl<R: RatingRepository> ListRatingsUseCase<R> {
    pub async fn execute(&self, page: PageRequest) -> Result<Vec<Rating>, ApiError> {
        self.repo.list(page.clamped()).await
    }
}

// ── ListUserRatings ──────────────────────────────────────────────────────────

pub struct ListUserRatingsUseCase<R: RatingRepository> {
    pub repo: R,
}

impl<R: RatingRepository> ListUserRatingsUseCase<R> {
    pub async fn execute(&self, user_id: i32) -> Result<Vec<RatedGame>, ApiError> {
        self.repo.list_by_user(user_id).await
    }
}

// ── ListGameRatings ──────────────────────────────────────────────────────────

pub struct ListGameRatingsUseCase<R: RatingRepository, G: GameRepository> {
    pub ratings: R,
    pub games: G,
}

impl<R: RatingRepository, G: GameRepository> ListGameRatingsUseCase<R, G> {
    pub async fn execute(&self, game_id: i32) -> Result<Vec<GameRating>, ApiError> {
        if self.games.find_by_id(game_id).await?.is_none() {
            return Err(ApiError::GameNotFound);
        }
        self.ratings.list_by_game(game_id).await
    }
}

// ── UpdateRating ─────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct UpdateRatingInput {
    pub rating: Option<f64>,
    pub comment: Option<String>,
}

pub struct UpdateRatingUseCase<R: RatingRepository> {
    pub repo: R,
}

impl<R: RatingRepository> UpdateRatingUseCase<R> {
    pub async fn execute(
        &self,
        actor: &User,
        rating_id: i32,
        input: UpdateRatingInput,
    ) -> Result<Rating, ApiError> {
        let rating = owned_rating(
            &self.repo,
            actor,
            rating_id,
            "Not authorized to update this rating",
        )
        .await?;
        let score = input.rating.map(parse_score).transpose()?;
        self.repo
            .update(
                rating.id,
                &RatingChanges {
                    score,
                    comment: input.comment,
                },
            )
            .await
    }
}

// ── DeleteRating ─────────────────────────────────────────────────────────────

pub struct DeleteRatingUseCase<R: RatingRepository> {
    pub repo: R,
}

impl<R: RatingRepository> DeleteRatingUseCase<R> {
    /// Returns the deleted rating.
    pub async fn execute(&self, actor: &User, rating_id: i32) -> Result<Rating, ApiError> {
        let rating = owned_rating(
            &self.repo,
            actor,
            rating_id,
            "Not authorized to delete this rating",
        )
        .await?;
        if !self.repo.delete(rating.id).await? {
            return Err(ApiError::RatingNotFound);
        }
        Ok(rating)
    }
}
