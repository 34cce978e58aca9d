use playnext_domain::game::GameSortBy;
use playnext_domain::pagination::PageRequest;

use crate::domain::repository::{GameCatalog, GameRepository};
use crate::domain::types::{Game, GameChanges, GameFilter, NewGame, User};
use crate::error::{ADMIN_REQUIRED, ApiError};

/// Result cap for the local name search and its IGDB fallback.
pub const SEARCH_LIMIT: u32 = 10;

fn ensure_admin(actor: &User) -> Result<(), ApiError> {
    if actor.is_admin {
        Ok(())
    } else {
        Err(ApiError::Forbidden(ADMIN_REQUIRED))
    }
}

// ── ListGames ────────────────────────────────────────────────────────────────

pub struct ListGamesUseCase<R: GameRepository> {
    pub repo: R,
}

impl<R: GameRepository> ListGamesUseCase<R> {
    pub async fn execute(
        &self,
        filter: GameFilter,
        sort_by: GameSortBy,
        page: PageRequest,
    ) -> Result<Vec<Game>, ApiError> {
        self.repo.list(&filter, sort_by, page.clamped()).await
    }
}

// ── GetGame ──────────────────────────────────────────────────────────────────

pub struct GetGameUseCase<R: GameRepository> {
    pub repo: R,
}

impl<R: GameRepository> GetGameUseCase<R> {
    pub async fn execute(&self, game_id: i32) -> Result<Game, ApiError> {
        self.repo
            .find_by_id(game_id)
            .await?
            .ok_or(ApiError::GameNotFound)
    }
}

// ── ImportGame ───────────────────────────────────────────────────────────────

pub struct ImportGameUseCase<R: GameRepository, C: GameCatalog> {
    pub games: R,
    pub catalog: C,
}

impl<R: GameRepository, C: GameCatalog> ImportGameUseCase<R, C> {
    /// Look `title` up on IGDB and store the best hit.
    pub async fn execute(&self, actor: &User, title: &str) -> Result<Game, ApiError> {
        ensure_admin(actor)?;
        let title = title.trim();
        if title.is_empty() {
            return Err(ApiError::Validation("title must not be empty".into()));
        }

        let found = self
            .catalog
            .search(title, 1)
            .await?
            .into_iter()
            .next()
            .ok_or(ApiError::NotFoundOnIgdb)?;

        if let Some(igdb_id) = found.igdb_id {
            if self.games.find_by_igdb_id(igdb_id).await?.is_some() {
                return Err(ApiError::GameAlreadyRegistered);
            }
        }

        let game = self.games.create(&found).await?;
        tracing::info!(game_id = game.id, igdb_id = ?game.igdb_id, "game imported");
        Ok(game)
    }
}

// ── UpdateGame ───────────────────────────────────────────────────────────────

pub struct UpdateGameUseCase<R: GameRepository> {
    pub repo: R,
}

impl<R: GameRepository> UpdateGameUseCase<R> {
    pub async fn execute(
        &self,
        actor: &User,
        game_id: i32,
        changes: GameChanges,
    ) -> Result<Game, ApiError> {
        ensure_admin(actor)?;
        if self.repo.find_by_id(game_id).await?.is_none() {
            return Err(ApiError::GameNotFound);
        }
        if matches!(changes.name.as_deref(), Some(name) if name.trim().is_empty()) {
            return Err(ApiError::Validation("name must not be empty".into()));
        }
        self.repo.update(game_id, &changes).await
    }
}

// ── DeleteGame ───────────────────────────────────────────────────────────────

pub struct DeleteGameUseCase<R: GameRepository> {
    pub repo: R,
}

impl<R: GameRepository> DeleteGameUseCase<R> {
    /// Returns the deleted game; its ratings and backlog items go with it.
    pub async fn execute(&self, actor: &User, game_id: i32) -> Result<Game, ApiError> {
        ensure_admin(actor)?;
        let game = self
            .repo
            .find_by_id(game_id)
            .await?
            .ok_or(ApiError::GameNotFound)?;
        if !self.repo.delete(game.id).await? {
            return Err(ApiError::GameNotFound);
        }
        Ok(game)
    }
}

// ── SearchGames ──────────────────────────────────────────────────────────────

pub struct SearchGamesUseCase<R: GameRepository, C: GameCatalog> {
    pub games: R,
    pub catalog: C,
}

impl<R: GameRepository, C: GameCatalog> SearchGamesUseCase<R, C> {
    /// Local name search first; on a miss, import every IGDB hit not stored yet.
    pub async fn execute(&self, query: &str) -> Result<Vec<Game>, ApiError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ApiError::Validation("search query must not be empty".into()));
        }

        let local = self
            .games
            .search_by_name(query, u64::from(SEARCH_LIMIT))
            .await?;
        if !local.is_empty() {
            return Ok(local);
        }

        let hits = self.catalog.search(query, SEARCH_LIMIT).await?;
        tracing::debug!(query, hits = hits.len(), "local miss, searched IGDB");

        let mut games = Vec::with_capacity(hits.len());
        for hit in hits {
            games.push(self.store_if_new(hit).await?);
        }
        if games.is_empty() {
            return Err(ApiError::NoGamesFound);
        }
        Ok(games)
    }

    async fn store_if_new(&self, hit: NewGame) -> Result<Game, ApiError> {
        if let Some(igdb_id) = hit.igdb_id {
            if let Some(existing) = self.games.find_by_igdb_id(igdb_id).await? {
                return Ok(existing);
            }
        }
        self.games.create(&hit).await
    }
}
