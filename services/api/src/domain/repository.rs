#![allow(async_fn_in_trait)]

use playnext_domain::game::GameSortBy;
use playnext_domain::pagination::PageRequest;

use crate::domain::types::{
    BacklogChanges, BacklogEntry, BacklogItem, Game, GameChanges, GameFilter, GameRating,
    NewBacklogItem, NewGame, NewRating, NewUser, RatedGame, Rating, RatingChanges,
    RecommendationSet, ScoreEntry, User, UserChanges,
};
use crate::error::ApiError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, ApiError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;
    async fn list(&self, page: PageRequest) -> Result<Vec<User>, ApiError>;
    async fn create(&self, user: &NewUser) -> Result<User, ApiError>;
    async fn update(&self, id: i32, changes: &UserChanges) -> Result<User, ApiError>;
    /// Delete a user and, through FK cascades, everything they own.
    /// Returns `true` if a row was deleted.
    async fn delete(&self, id: i32) -> Result<bool, ApiError>;
}

/// Repository for the local game catalog.
pub trait GameRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Game>, ApiError>;
    async fn find_by_igdb_id(&self, igdb_id: i64) -> Result<Option<Game>, ApiError>;
    async fn list(
        &self,
        filter: &GameFilter,
        sort_by: GameSortBy,
        page: PageRequest,
    ) -> Result<Vec<Game>, ApiError>;
    /// Case-insensitive substring match on the game name.
    async fn search_by_name(&self, query: &str, limit: u64) -> Result<Vec<Game>, ApiError>;
    async fn create(&self, game: &NewGame) -> Result<Game, ApiError>;
    async fn update(&self, id: i32, changes: &GameChanges) -> Result<Game, ApiError>;
    async fn delete(&self, id: i32) -> Result<bool, ApiError>;
}

/// Repository for ratings.
pub trait RatingRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Rating>, ApiError>;
    async fn find_by_user_and_game(
        &self,
        user_id: i32,
        game_id: i32,
    ) -> Result<Option<Rating>, ApiError>;
    async fn list(&self, page: PageRequest) -> Result<Vec<Rating>, ApiError>;
    async fn list_by_user(&self, user_id: i32) -> Result<Vec<RatedGame>, ApiError>;
    async fn list_by_game(&self, game_id: i32) -> Result<Vec<GameRating>, ApiError>;
    async fn list_scores(&self) -> Result<Vec<ScoreEntry>, ApiError>;
    /// Fails with [`ApiError::RatingAlreadyExists`] when the pair is already rated.
    async fn create(&self, rating: &NewRating) -> Result<Rating, ApiError>;
    async fn update(&self, id: i32, changes: &RatingChanges) -> Result<Rating, ApiError>;
    async fn delete(&self, id: i32) -> Result<bool, ApiError>;
}

/// Repository for backlog items.
pub trait BacklogRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<BacklogItem>, ApiError>;
    async fn list_by_user(
        &self,
        user_id: i32,
        page: PageRequest,
    ) -> Result<Vec<BacklogItem>, ApiError>;
    async fn list_entries_by_user(&self, user_id: i32) -> Result<Vec<BacklogEntry>, ApiError>;
    async fn create(&self, item: &NewBacklogItem) -> Result<BacklogItem, ApiError>;
    async fn update(&self, id: i32, changes: &BacklogChanges) -> Result<BacklogItem, ApiError>;
    async fn delete(&self, id: i32) -> Result<bool, ApiError>;
}

/// Durable storage of each user's latest recommendation set.
pub trait RecommendationStore: Send + Sync {
    async fn latest(&self, user_id: i32) -> Result<Option<RecommendationSet>, ApiError>;
    /// Atomically replace every stored set for the user with `set`.
    async fn replace(&self, user_id: i32, set: &RecommendationSet) -> Result<(), ApiError>;
}

/// Short-lived cache in front of [`RecommendationStore`].
pub trait RecommendationCache: Send + Sync {
    async fn get(&self, user_id: i32) -> Result<Option<RecommendationSet>, ApiError>;
    async fn set(
        &self,
        user_id: i32,
        set: &RecommendationSet,
        ttl_secs: u64,
    ) -> Result<(), ApiError>;
    async fn invalidate(&self, user_id: i32) -> Result<(), ApiError>;
}

/// Port for the external generative-language model.
pub trait RecommendationModel: Send + Sync {
    /// Submit a prompt and return the model's text reply.
    async fn generate(&self, prompt: &str) -> Result<String, ApiError>;
}

/// Port for the external game catalog (IGDB).
pub trait GameCatalog: Send + Sync {
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<NewGame>, ApiError>;
}

/// Password hashing.
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &str) -> Result<String, ApiError>;
    async fn verify(&self, password: &str, hash: &str) -> Result<bool, ApiError>;
}
