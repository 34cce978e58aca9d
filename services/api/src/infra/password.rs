use anyhow::Context as _;

use crate::domain::repository::PasswordHasher;
use crate::error::ApiError;

/// bcrypt on the blocking pool.
#[derive(Clone, Copy)]
pub struct BcryptHasher {
    pub cost: u32,
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl PasswordHasher for BcryptHasher {
    async fn hash(&self, password: &str) -> Result<String, ApiError> {
        let password = password.to_owned();
        let cost = self.cost;
        let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .context("join bcrypt hash task")?
            .context("bcrypt hash")?;
        Ok(hash)
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, ApiError> {
        let password = password.to_owned();
        let hash = hash.to_owned();
        let ok = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .context("join bcrypt verify task")?;
        // A malformed stored hash never matches.
        Ok(ok.unwrap_or(false))
    }
}
