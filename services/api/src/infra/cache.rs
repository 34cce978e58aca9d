use anyhow::Context as _;
use deadpool_redis::Pool;
use deadpool_redis::redis::AsyncCommands;

use crate::domain::repository::RecommendationCache;
use crate::domain::types::RecommendationSet;
use crate::error::ApiError;

#[derive(Clone)]
pub struct RedisRecommendationCache {
    pub pool: Pool,
}

fn recommendations_key(user_id: i32) -> String {
    format!("recommendations:{user_id}")
}

impl RecommendationCache for RedisRecommendationCache {
    async fn get(&self, user_id: i32) -> Result<Option<RecommendationSet>, ApiError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ApiError::Internal(e.into()))?;
        let value: Option<String> = conn
            .get(recommendations_key(user_id))
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| ApiError::Internal(e.into()))?;
        value
            .map(|json| serde_json::from_str(&json).context("decode cached recommendations"))
            .transpose()
            .map_err(ApiError::Internal)
    }

    async fn set(
        &self,
        user_id: i32,
        set: &RecommendationSet,
        ttl_secs: u64,
    ) -> Result<(), ApiError> {
        let json = serde_json::to_string(set).context("encode recommendations")?;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ApiError::Internal(e.into()))?;
        let (): () = conn
            .set_ex(recommendations_key(user_id), json, ttl_secs.max(1))
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| ApiError::Internal(e.into()))?;
        Ok(())
    }

    async fn invalidate(&self, user_id: i32) -> Result<(), ApiError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ApiError::Internal(e.into()))?;
        let _: i64 = conn
            .del(recommendations_key(user_id))
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| ApiError::Internal(e.into()))?;
        Ok(())
    }
}
