use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{Set, Unchanged},
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, Order, QueryFilter, QueryOrder,
    QuerySelect, SqlErr, TransactionTrait,
    sea_query::{Expr, Func, LikeExpr},
};

use playnext_api_schema::{backlog_items, games, ratings, recommendations, users};
use playnext_domain::backlog::BacklogStatus;
use playnext_domain::game::{GameSortBy, GameSortField};
use playnext_domain::pagination::{PageRequest, Sort};
use playnext_domain::score::Score;

use crate::domain::repository::{
    BacklogRepository, GameRepository, RatingRepository, RecommendationStore, UserRepository,
};
use crate::domain::types::{
    BacklogChanges, BacklogEntry, BacklogItem, Game, GameChanges, GameFilter, GameRating,
    NewBacklogItem, NewGame, NewRating, NewUser, RatedGame, Rating, RatingChanges,
    RecommendationSet, ScoreEntry, User, UserChanges,
};
use crate::error::ApiError;

const LIKE_ESCAPE: char = '\\';

/// Make `%`, `_` and the escape character itself match literally.
fn escape_like(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            out.push(LIKE_ESCAPE);
        }
        out.push(c);
    }
    out
}

/// `lower(column) LIKE '%needle%' ESCAPE '\'`.
fn icontains(column: games::Column, needle: &str) -> sea_orm::sea_query::SimpleExpr {
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
    Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(pattern).escape(LIKE_ESCAPE))
}

fn is_unique_violation(err: &DbErr) -> Option<String> {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => Some(msg),
        _ => None,
    }
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

/// Unique violations on `users` name the offending column in the constraint.
fn user_conflict(err: DbErr, what: &'static str) -> ApiError {
    match is_unique_violation(&err) {
        Some(msg) if msg.contains("email") => ApiError::EmailTaken,
        Some(_) => ApiError::UsernameTaken,
        None => ApiError::Internal(anyhow::Error::new(err).context(what)),
    }
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
            .context("find user by username")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<User>, ApiError> {
        let models = users::Entity::find()
            .order_by_asc(users::Column::Id)
            .offset(page.skip)
            .limit(page.limit)
            .all(&self.db)
            .await
            .context("list users")?;
        Ok(models.into_iter().map(user_from_model).collect())
    }

    async fn create(&self, user: &NewUser) -> Result<User, ApiError> {
        let model = users::ActiveModel {
            username: Set(user.username.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            user_age: Set(user.user_age),
            registration_date: Set(Utc::now()),
            is_admin: Set(false),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| user_conflict(e, "create user"))?;
        Ok(user_from_model(model))
    }

    async fn update(&self, id: i32, changes: &UserChanges) -> Result<User, ApiError> {
        let mut am = users::ActiveModel {
            id: Unchanged(id),
            ..Default::default()
        };
        if let Some(username) = &changes.username {
            am.username = Set(username.clone());
        }
        if let Some(email) = &changes.email {
            am.email = Set(email.clone());
        }
        if let Some(hash) = &changes.password_hash {
            am.password_hash = Set(hash.clone());
        }
        if let Some(age) = changes.user_age {
            am.user_age = Set(Some(age));
        }
        if !am.is_changed() {
            return self.find_by_id(id).await?.ok_or(ApiError::UserNotFound);
        }
        let model = am.update(&self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => ApiError::UserNotFound,
            e => user_conflict(e, "update user"),
        })?;
        Ok(user_from_model(model))
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let result = users::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete user")?;
        Ok(result.rows_affected > 0)
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        username: model.username,
        email: model.email,
        password_hash: model.password_hash,
        user_age: model.user_age,
        registration_date: model.registration_date,
        is_admin: model.is_admin,
    }
}

// ── Game repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbGameRepository {
    pub db: DatabaseConnection,
}

fn sort_column(field: GameSortField) -> games::Column {
    match field {
        GameSortField::GameId => games::Column::Id,
        GameSortField::GameName => games::Column::Name,
        GameSortField::Genre => games::Column::Genre,
        GameSortField::Platform => games::Column::Platform,
        GameSortField::ReleaseDate => games::Column::ReleaseDate,
        GameSortField::AgeRating => games::Column::AgeRating,
        GameSortField::IgdbId => games::Column::IgdbId,
    }
}

impl GameRepository for DbGameRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Game>, ApiError> {
        let model = games::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find game by id")?;
        Ok(model.map(game_from_model))
    }

    async fn find_by_igdb_id(&self, igdb_id: i64) -> Result<Option<Game>, ApiError> {
        let model = games::Entity::find()
            .filter(games::Column::IgdbId.eq(igdb_id))
            .one(&self.db)
            .await
            .context("find game by igdb id")?;
        Ok(model.map(game_from_model))
    }

    async fn list(
        &self,
        filter: &GameFilter,
        sort_by: GameSortBy,
        page: PageRequest,
    ) -> Result<Vec<Game>, ApiError> {
        let mut query = games::Entity::find();
        if let Some(genre) = &filter.genre {
            query = query.filter(icontains(games::Column::Genre, genre));
        }
        if let Some(platform) = &filter.platform {
            query = query.filter(icontains(games::Column::Platform, platform));
        }
        let order = match sort_by.sort {
            Sort::Asc => Order::Asc,
            Sort::Desc => Order::Desc,
        };
        query = query.order_by(sort_column(sort_by.field), order);
        if sort_by.field != GameSortField::GameId {
            query = query.order_by_asc(games::Column::Id);
        }
        let models = query
            .offset(page.skip)
            .limit(page.limit)
            .all(&self.db)
            .await
            .context("list games")?;
        Ok(models.into_iter().map(game_from_model).collect())
    }

    async fn search_by_name(&self, query: &str, limit: u64) -> Result<Vec<Game>, ApiError> {
        let models = games::Entity::find()
            .filter(icontains(games::Column::Name, query))
            .order_by_asc(games::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .context("search games by name")?;
        Ok(models.into_iter().map(game_from_model).collect())
    }

    async fn create(&self, game: &NewGame) -> Result<Game, ApiError> {
        let model = games::ActiveModel {
            name: Set(game.name.clone()),
            genre: Set(game.genre.clone()),
            platform: Set(game.platform.clone()),
            release_date: Set(game.release_date),
            image_url: Set(game.image_url.clone()),
            igdb_id: Set(game.igdb_id),
            age_rating: Set(game.age_rating.clone()),
            igdb_link: Set(game.igdb_link.clone()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| match is_unique_violation(&e) {
            Some(_) => ApiError::GameAlreadyRegistered,
            None => ApiError::Internal(anyhow::Error::new(e).context("create game")),
        })?;
        Ok(game_from_model(model))
    }

    async fn update(&self, id: i32, changes: &GameChanges) -> Result<Game, ApiError> {
        let mut am = games::ActiveModel {
            id: Unchanged(id),
            ..Default::default()
        };
        if let Some(v) = &changes.name {
            am.name = Set(v.clone());
        }
        if let Some(v) = &changes.genre {
            am.genre = Set(v.clone());
        }
        if let Some(v) = &changes.platform {
            am.platform = Set(v.clone());
        }
        if let Some(v) = changes.release_date {
            am.release_date = Set(v);
        }
        if let Some(v) = &changes.image_url {
            am.image_url = Set(v.clone());
        }
        if let Some(v) = &changes.age_rating {
            am.age_rating = Set(v.clone());
        }
        if let Some(v) = &changes.igdb_link {
            am.igdb_link = Set(v.clone());
        }
        if !am.is_changed() {
            return self.find_by_id(id).await?.ok_or(ApiError::GameNotFound);
        }
        let model = am.update(&self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => ApiError::GameNotFound,
            e => ApiError::Internal(anyhow::Error::new(e).context("update game")),
        })?;
        Ok(game_from_model(model))
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let result = games::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete game")?;
        Ok(result.rows_affected > 0)
    }
}

fn game_from_model(model: games::Model) -> Game {
    Game {
        id: model.id,
        name: model.name,
        genre: model.genre,
        platform: model.platform,
        release_date: model.release_date,
        image_url: model.image_url,
        igdb_id: model.igdb_id,
        age_rating: model.age_rating,
        igdb_link: model.igdb_link,
    }
}

// ── Rating repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRatingRepository {
    pub db: DatabaseConnection,
}

impl RatingRepository for DbRatingRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Rating>, ApiError> {
        let model = ratings::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find rating by id")?;
        model.map(rating_from_model).transpose()
    }

    async fn find_by_user_and_game(
        &self,
        user_id: i32,
        game_id: i32,
    ) -> Result<Option<Rating>, ApiError> {
        let model = ratings::Entity::find()
            .filter(ratings::Column::UserId.eq(user_id))
            .filter(ratings::Column::GameId.eq(game_id))
            .one(&self.db)
            .await
            .context("find rating by user and game")?;
        model.map(rating_from_model).transpose()
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<Rating>, ApiError> {
        let models = ratings::Entity::find()
            .order_by_asc(ratings::Column::Id)
            .offset(page.skip)
            .limit(page.limit)
            .all(&self.db)
            .await
            .context("list ratings")?;
        models.into_iter().map(rating_from_model).collect()
    }

    async fn list_by_user(&self, user_id: i32) -> Result<Vec<RatedGame>, ApiError> {
        let rows = ratings::Entity::find()
            .filter(ratings::Column::UserId.eq(user_id))
            .find_also_related(games::Entity)
            .order_by_asc(ratings::Column::Id)
            .all(&self.db)
            .await
            .context("list ratings by user")?;
        rows.into_iter()
            .filter_map(|(rating, game)| game.map(|g| (rating, g)))
            .map(|(rating, game)| -> Result<RatedGame, ApiError> {
                Ok(RatedGame {
                    rating: rating_from_model(rating)?,
                    game: game_from_model(game),
                })
            })
            .collect()
    }

    async fn list_by_game(&self, game_id: i32) -> Result<Vec<GameRating>, ApiError> {
        let Some(game) = games::Entity::find_by_id(game_id)
            .one(&self.db)
            .await
            .context("find game for ratings")?
            .map(game_from_model)
        else {
            return Ok(Vec::new());
        };
        let rows = ratings::Entity::find()
            .filter(ratings::Column::GameId.eq(game_id))
            .find_also_related(users::Entity)
            .order_by_asc(ratings::Column::Id)
            .all(&self.db)
            .await
            .context("list ratings by game")?;
        rows.into_iter()
            .filter_map(|(rating, user)| user.map(|u| (rating, u)))
            .map(|(rating, user)| -> Result<GameRating, ApiError> {
                Ok(GameRating {
                    rating: rating_from_model(rating)?,
                    username: user.username,
                    game: game.clone(),
                })
            })
            .collect()
    }

    async fn list_scores(&self) -> Result<Vec<ScoreEntry>, ApiError> {
        let rows: Vec<(i32, i32, f64)> = ratings::Entity::find()
            .select_only()
            .columns([
                ratings::Column::UserId,
                ratings::Column::GameId,
                ratings::Column::Rating,
            ])
            .into_tuple()
            .all(&self.db)
            .await
            .context("list rating scores")?;
        Ok(rows
            .into_iter()
            .map(|(user_id, game_id, score)| ScoreEntry {
                user_id,
                game_id,
                score,
            })
            .collect())
    }

    async fn create(&self, rating: &NewRating) -> Result<Rating, ApiError> {
        let model = ratings::ActiveModel {
            user_id: Set(rating.user_id),
            game_id: Set(rating.game_id),
            rating: Set(rating.score.value()),
            comment: Set(rating.comment.clone()),
            rating_date: Set(rating.rating_date),
            updated_at: Set(None),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| match is_unique_violation(&e) {
            Some(_) => ApiError::RatingAlreadyExists,
            None => ApiError::Internal(anyhow::Error::new(e).context("create rating")),
        })?;
        rating_from_model(model)
    }

    async fn update(&self, id: i32, changes: &RatingChanges) -> Result<Rating, ApiError> {
        let mut am = ratings::ActiveModel {
            id: Unchanged(id),
            updated_at: Set(Some(Utc::now())),
            ..Default::default()
        };
        if let Some(score) = changes.score {
            am.rating = Set(score.value());
        }
        if let Some(comment) = &changes.comment {
            am.comment = Set(Some(comment.clone()));
        }
        let model = am.update(&self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => ApiError::RatingNotFound,
            e => ApiError::Internal(anyhow::Error::new(e).context("update rating")),
        })?;
        rating_from_model(model)
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let result = ratings::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete rating")?;
        Ok(result.rows_affected > 0)
    }
}

fn stored_score(value: f64) -> Result<Score, ApiError> {
    Score::new(value)
        .context("stored score out of range")
        .map_err(ApiError::Internal)
}

fn rating_from_model(model: ratings::Model) -> Result<Rating, ApiError> {
    Ok(Rating {
        id: model.id,
        user_id: model.user_id,
        game_id: model.game_id,
        score: stored_score(model.rating)?,
        comment: model.comment,
        rating_date: model.rating_date,
        updated_at: model.updated_at,
    })
}

// ── Backlog repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbBacklogRepository {
    pub db: DatabaseConnection,
}

impl BacklogRepository for DbBacklogRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<BacklogItem>, ApiError> {
        let model = backlog_items::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find backlog item by id")?;
        model.map(backlog_from_model).transpose()
    }

    async fn list_by_user(
        &self,
        user_id: i32,
        page: PageRequest,
    ) -> Result<Vec<BacklogItem>, ApiError> {
        let models = backlog_items::Entity::find()
            .filter(backlog_items::Column::UserId.eq(user_id))
            .order_by_asc(backlog_items::Column::Id)
            .offset(page.skip)
            .limit(page.limit)
            .all(&self.db)
            .await
            .context("list backlog items")?;
        models.into_iter().map(backlog_from_model).collect()
    }

    async fn list_entries_by_user(&self, user_id: i32) -> Result<Vec<BacklogEntry>, ApiError> {
        let rows = backlog_items::Entity::find()
            .filter(backlog_items::Column::UserId.eq(user_id))
            .find_also_related(games::Entity)
            .order_by_asc(backlog_items::Column::Id)
            .all(&self.db)
            .await
            .context("list backlog entries")?;
        rows.into_iter()
            .filter_map(|(item, game)| game.map(|g| (item, g)))
            .map(|(item, game)| -> Result<BacklogEntry, ApiError> {
                Ok(BacklogEntry {
                    item: backlog_from_model(item)?,
                    game_name: game.name,
                })
            })
            .collect()
    }

    async fn create(&self, item: &NewBacklogItem) -> Result<BacklogItem, ApiError> {
        let model = backlog_items::ActiveModel {
            user_id: Set(item.user_id),
            game_id: Set(item.game_id),
            status: Set(item.status.as_str().to_owned()),
            rating: Set(item.score.map(Score::value)),
            added_date: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("create backlog item")?;
        backlog_from_model(model)
    }

    async fn update(&self, id: i32, changes: &BacklogChanges) -> Result<BacklogItem, ApiError> {
        let mut am = backlog_items::ActiveModel {
            id: Unchanged(id),
            ..Default::default()
        };
        if let Some(status) = changes.status {
            am.status = Set(status.as_str().to_owned());
        }
        if let Some(score) = changes.score {
            am.rating = Set(Some(score.value()));
        }
        if !am.is_changed() {
            return self
                .find_by_id(id)
                .await?
                .ok_or(ApiError::BacklogItemNotFound);
        }
        let model = am.update(&self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => ApiError::BacklogItemNotFound,
            e => ApiError::Internal(anyhow::Error::new(e).context("update backlog item")),
        })?;
        backlog_from_model(model)
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let result = backlog_items::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete backlog item")?;
        Ok(result.rows_affected > 0)
    }
}

fn backlog_from_model(model: backlog_items::Model) -> Result<BacklogItem, ApiError> {
    let status = model
        .status
        .parse::<BacklogStatus>()
        .context("stored backlog status")
        .map_err(ApiError::Internal)?;
    Ok(BacklogItem {
        id: model.id,
        user_id: model.user_id,
        game_id: model.game_id,
        status,
        score: model.rating.map(stored_score).transpose()?,
        added_date: model.added_date,
    })
}

// ── Recommendation store ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRecommendationStore {
    pub db: DatabaseConnection,
}

impl RecommendationStore for DbRecommendationStore {
    async fn latest(&self, user_id: i32) -> Result<Option<RecommendationSet>, ApiError> {
        let Some(model) = recommendations::Entity::find()
            .filter(recommendations::Column::UserId.eq(user_id))
            .order_by_desc(recommendations::Column::GeneratedAt)
            .one(&self.db)
            .await
            .context("find latest recommendation")?
        else {
            return Ok(None);
        };
        let items =
            serde_json::from_value(model.items).context("decode stored recommendation items")?;
        Ok(Some(RecommendationSet {
            items,
            raw_response: model.raw_response,
            generated_at: model.generated_at,
        }))
    }

    async fn replace(&self, user_id: i32, set: &RecommendationSet) -> Result<(), ApiError> {
        let items = serde_json::to_value(&set.items).context("encode recommendation items")?;
        let set = set.clone();
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                let items = items.clone();
                let set = set.clone();
                Box::pin(async move {
                    recommendations::Entity::delete_many()
                        .filter(recommendations::Column::UserId.eq(user_id))
                        .exec(txn)
                        .await?;
                    recommendations::ActiveModel {
                        user_id: Set(user_id),
                        generated_at: Set(set.generated_at),
                        raw_response: Set(set.raw_response),
                        items: Set(items),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;
                    Ok(())
                })
            })
            .await
            .context("replace recommendations")?;
        Ok(())
    }
}
