use axum::extract::FromRef;
use deadpool_redis::Pool as RedisPool;
use sea_orm::DatabaseConnection;

use playnext_auth_types::identity::JwtSecret;

use crate::infra::cache::RedisRecommendationCache;
use crate::infra::db::{
    DbBacklogRepository, DbGameRepository, DbRatingRepository, DbRecommendationStore,
    DbUserRepository,
};
use crate::infra::gemini::GeminiClient;
use crate::infra::igdb::IgdbClient;
use crate::infra::password::BcryptHasher;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub redis: RedisPool,
    pub jwt_secret: JwtSecret,
    pub access_token_expire_minutes: u64,
    pub recommendation_ttl_secs: u64,
    pub igdb: IgdbClient,
    pub gemini: GeminiClient,
    pub hasher: BcryptHasher,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn game_repo(&self) -> DbGameRepository {
        DbGameRepository {
            db: self.db.clone(),
        }
    }

    pub fn rating_repo(&self) -> DbRatingRepository {
        DbRatingRepository {
            db: self.db.clone(),
        }
    }

    pub fn backlog_repo(&self) -> DbBacklogRepository {
        DbBacklogRepository {
            db: self.db.clone(),
        }
    }

    pub fn recommendation_store(&self) -> DbRecommendationStore {
        DbRecommendationStore {
            db: self.db.clone(),
        }
    }

    pub fn recommendation_cache(&self) -> RedisRecommendationCache {
        RedisRecommendationCache {
            pool: self.redis.clone(),
        }
    }
}

impl FromRef<AppState> for JwtSecret {
    fn from_ref(state: &AppState) -> Self {
        state.jwt_secret.clone()
    }
}

impl FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}
