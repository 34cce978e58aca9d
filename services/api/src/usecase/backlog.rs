use playnext_domain::backlog::BacklogStatus;
use playnext_domain::pagination::PageRequest;

use crate::domain::repository::{BacklogRepository, GameRepository};
use crate::domain::types::{BacklogChanges, BacklogItem, NewBacklogItem, User};
use crate::error::ApiError;
use crate::usecase::rating::parse_score;

fn parse_status(value: &str) -> Result<BacklogStatus, ApiError> {
    value
        .parse()
        .map_err(|e: playnext_domain::backlog::UnknownBacklogStatus| {
            ApiError::Validation(e.to_string())
        })
}

async fn owned_item<R: BacklogRepository>(
    repo: &R,
    actor: &User,
    item_id: i32,
    denied: &'static str,
) -> Result<BacklogItem, ApiError> {
    let item = repo
        .find_by_id(item_id)
        .await?
        .ok_or(ApiError::BacklogItemNotFound)?;
    if item.user_id != actor.id {
        return Err(ApiError::Forbidden(denied));
    }
    Ok(item)
}

// ── CreateBacklogItem ────────────────────────────────────────────────────────

pub struct CreateBacklogItemInput {
    pub user_id: i32,
    pub game_id: i32,
    pub status: String,
    pub rating: Option<f64>,
}

pub struct CreateBacklogItemUseCase<B: BacklogRepository, G: GameRepository> {
    pub backlog: B,
    pub games: G,
}

impl<B: BacklogRepository, G: GameRepository> CreateBacklogItemUseCase<B, G> {
    pub async fn execute(
        &self,
        actor: &User,
        input: CreateBacklogItemInput,
    ) -> Result<BacklogItem, ApiError> {
        if input.user_id != actor.id {
            return Err(ApiError::Forbidden(
                "Cannot create backlog item for another user.",
            ));
        }
        let status = parse_status(&input.status)?;
        let score = input.rating.map(parse_score).transpose()?;
        if self.games.find_by_id(input.game_id).await?.is_none() {
            return Err(ApiError::GameNotFound);
        }
        self.backlog
            .create(&NewBacklogItem {
                user_id: actor.id,
                game_id: input.game_id,
                status,
                score,
            })
            .await
    }
}

// ── GetBacklogItem ───────────────────────────────────────────────────────────

pub struct GetBacklogItemUseCase<B: BacklogRepository> {
    pub repo: B,
}

impl<B: BacklogRepository> GetBacklogItemUseCase<B> {
    pub async fn execute(&self, actor: &User, item_id: i32) -> Result<BacklogItem, ApiError> {
        owned_item(
            &self.repo,
            actor,
            item_id,
            "Not authorized to access this backlog item",
        )
        .await
    }
}

// ── ListBacklog ──────────────────────────────────────────────────────────────

pub struct ListBacklogUseCase<B: BacklogRepository> {
    pub repo: B,
}

impl<B: BacklogRepository> ListBacklogUseCase<B> {
    pub async fn execute(
        &self,
        user_id: i32,
        page: PageRequest,
    ) -> Result<Vec<BacklogItem>, ApiError> {
        self.repo.list_by_user(user_id, page.clamped()).await
    }
}

// ── UpdateBacklogItem ────────────────────────────────────────────────────────

#[derive(Default)]
pub struct UpdateBacklogItemInput {
    pub status: Option<String>,
    pub rating: Option<f64>,
}

pub struct UpdateBacklogItemUseCase<B: BacklogRepository> {
    pub repo: B,
}

impl<B: BacklogRepository> UpdateBacklogItemUseCase<B> {
    pub async fn execute(
        &self,
        actor: &User,
        item_id: i32,
        input: UpdateBacklogItemInput,
    ) -> Result<BacklogItem, ApiError> {
        let item = owned_item(
            &self.repo,
            actor,
            item_id,
            "Not authorized to update this backlog item",
        )
        .await?;
        let changes = BacklogChanges {
            status: input.status.as_deref().map(parse_status).transpose()?,
            score: input.rating.map(parse_score).transpose()?,
        };
        self.repo.update(item.id, &changes).await
    }
}

// ── DeleteBacklogItem ────────────────────────────────────────────────────────

pub struct DeleteBacklogItemUseCase<B: BacklogRepository> {
    pub repo: B,
}

impl<B: BacklogRepository> DeleteBacklogItemUseCase<B> {
    pub async fn execute(&self, actor: &User, item_id: i32) -> Result<BacklogItem, ApiError> {
        let item = owned_item(
            &self.repo,
            actor,
            item_id,
            "Not authorized to delete this backlog item",
        )
        .await?;
        if !self.repo.delete(item.id).await? {
            return Err(ApiError::BacklogItemNotFound);
        }
        Ok(item)
    }
}
