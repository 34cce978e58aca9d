use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{NaiveDate, Utc};

use playnext_api::domain::repository::{
    BacklogRepository, GameCatalog, GameRepository, PasswordHasher, RatingRepository,
    RecommendationCache, RecommendationModel, RecommendationStore, UserRepository,
};
use playnext_api::domain::types::{
    BacklogChanges, BacklogEntry, BacklogItem, Game, GameChanges, GameFilter, GameRating,
    NewBacklogItem, NewGame, NewRating, NewUser, RatedGame, Rating, RatingChanges,
    RecommendationSet, ScoreEntry, User, UserChanges,
};
use playnext_api::error::ApiError;
use playnext_domain::game::{GameSortBy, GameSortField};
use playnext_domain::pagination::{PageRequest, Sort};
use playnext_domain::score::Score;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret";

fn page_of<T: Clone>(rows: impl Iterator<Item = T>, page: PageRequest) -> Vec<T> {
    rows.skip(page.skip as usize)
        .take(page.limit as usize)
        .collect()
}

// ── MockDb ───────────────────────────────────────────────────────────────────

/// In-memory tables shared by every mock repository, with FK cascades.
pub struct World {
    pub users: Vec<User>,
    pub games: Vec<Game>,
    pub ratings: Vec<Rating>,
    pub backlog: Vec<BacklogItem>,
    pub recommendations: HashMap<i32, RecommendationSet>,
    next_id: i32,
}

impl World {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Clone)]
pub struct MockDb(Arc<Mutex<World>>);

impl MockDb {
    pub fn new(users: Vec<User>, games: Vec<Game>) -> Self {
        Self(Arc::new(Mutex::new(World {
            users,
            games,
            ratings: vec![],
            backlog: vec![],
            recommendations: HashMap::new(),
            next_id: 1000,
        })))
    }

    pub fn empty() -> Self {
        Self::new(vec![], vec![])
    }

    pub fn lock(&self) -> MutexGuard<'_, World> {
        self.0.lock().unwrap()
    }

    pub fn users(&self) -> MockUserRepo {
        MockUserRepo(self.clone())
    }

    pub fn games(&self) -> MockGameRepo {
        MockGameRepo(self.clone())
    }

    pub fn ratings(&self) -> MockRatingRepo {
        MockRatingRepo(self.clone())
    }

    pub fn backlog(&self) -> MockBacklogRepo {
        MockBacklogRepo(self.clone())
    }

    pub fn recommendations(&self) -> MockRecommendationStore {
        MockRecommendationStore(self.clone())
    }

    /// Insert a rating directly, bypassing the use case checks.
    pub fn seed_rating(&self, user_id: i32, game_id: i32, score: f64) -> Rating {
        let mut world = self.lock();
        let rating = Rating {
            id: world.next_id(),
            user_id,
            game_id,
            score: Score::new(score).unwrap(),
            comment: None,
            rating_date: Utc::now(),
            updated_at: None,
        };
        world.ratings.push(rating.clone());
        rating
    }
}

// ── MockUserRepo ─────────────────────────────────────────────────────────────

pub struct MockUserRepo(MockDb);

impl UserRepository for MockUserRepo {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, ApiError> {
        Ok(self.0.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .0
            .lock()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .0
            .lock()
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<User>, ApiError> {
        Ok(page_of(self.0.lock().users.iter().cloned(), page))
    }

    async fn create(&self, user: &NewUser) -> Result<User, ApiError> {
        let mut world = self.0.lock();
        let created = User {
            id: world.next_id(),
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            user_age: user.user_age,
            registration_date: Utc::now(),
            is_admin: false,
        };
        world.users.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: i32, changes: &UserChanges) -> Result<User, ApiError> {
        let mut world = self.0.lock();
        let user = world
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(ApiError::UserNotFound)?;
        if let Some(ref username) = changes.username {
            user.username = username.clone();
        }
        if let Some(ref email) = changes.email {
            user.email = email.clone();
        }
        if let Some(ref hash) = changes.password_hash {
            user.password_hash = hash.clone();
        }
        if changes.user_age.is_some() {
            user.user_age = changes.user_age;
        }
        Ok(user.clone())
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let mut world = self.0.lock();
        let before = world.users.len();
        world.users.retain(|u| u.id != id);
        world.ratings.retain(|r| r.user_id != id);
        world.backlog.retain(|b| b.user_id != id);
        world.recommendations.remove(&id);
        Ok(world.users.len() < before)
    }
}

// ── MockGameRepo ─────────────────────────────────────────────────────────────

pub struct MockGameRepo(MockDb);

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl GameRepository for MockGameRepo {
    async fn find_by_id(&self, id: i32) -> Result<Option<Game>, ApiError> {
        Ok(self.0.lock().games.iter().find(|g| g.id == id).cloned())
    }

    async fn find_by_igdb_id(&self, igdb_id: i64) -> Result<Option<Game>, ApiError> {
        Ok(self
            .0
            .lock()
            .games
            .iter()
            .find(|g| g.igdb_id == Some(igdb_id))
            .cloned())
    }

    async fn list(
        &self,
        filter: &GameFilter,
        sort_by: GameSortBy,
        page: PageRequest,
    ) -> Result<Vec<Game>, ApiError> {
        let mut games: Vec<Game> = self
            .0
            .lock()
            .games
            .iter()
            .filter(|g| filter.genre.as_deref().is_none_or(|s| contains_ci(&g.genre, s)))
            .filter(|g| {
                filter
                    .platform
                    .as_deref()
                    .is_none_or(|s| contains_ci(&g.platform, s))
            })
            .cloned()
            .collect();
        games.sort_by(|a, b| {
            let ord = match sort_by.field {
                GameSortField::GameId => a.id.cmp(&b.id),
                GameSortField::GameName => a.name.cmp(&b.name),
                GameSortField::Genre => a.genre.cmp(&b.genre),
                GameSortField::Platform => a.platform.cmp(&b.platform),
                GameSortField::ReleaseDate => a.release_date.cmp(&b.release_date),
                GameSortField::AgeRating => a.age_rating.cmp(&b.age_rating),
                GameSortField::IgdbId => a.igdb_id.cmp(&b.igdb_id),
            };
            let ord = if sort_by.sort == Sort::Desc {
                ord.reverse()
            } else {
                ord
            };
            ord.then(a.id.cmp(&b.id))
        });
        Ok(page_of(games.into_iter(), page))
    }

    async fn search_by_name(&self, query: &str, limit: u64) -> Result<Vec<Game>, ApiError> {
        Ok(self
            .0
            .lock()
            .games
            .iter()
            .filter(|g| contains_ci(&g.name, query))
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn create(&self, game: &NewGame) -> Result<Game, ApiError> {
        let mut world = self.0.lock();
        if game.igdb_id.is_some() && world.games.iter().any(|g| g.igdb_id == game.igdb_id) {
            return Err(ApiError::GameAlreadyRegistered);
        }
        let created = Game {
            id: world.next_id(),
            name: game.name.clone(),
            genre: game.genre.clone(),
            platform: game.platform.clone(),
            release_date: game.release_date,
            image_url: game.image_url.clone(),
            igdb_id: game.igdb_id,
            age_rating: game.age_rating.clone(),
            igdb_link: game.igdb_link.clone(),
        };
        world.games.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: i32, changes: &GameChanges) -> Result<Game, ApiError> {
        let mut world = self.0.lock();
        let game = world
            .games
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or(ApiError::GameNotFound)?;
        if let Some(ref name) = changes.name {
            game.name = name.clone();
        }
        if let Some(ref genre) = changes.genre {
            game.genre = genre.clone();
        }
        if let Some(ref platform) = changes.platform {
            game.platform = platform.clone();
        }
        if let Some(date) = changes.release_date {
            game.release_date = date;
        }
        if let Some(ref url) = changes.image_url {
            game.image_url = url.clone();
        }
        if let Some(ref age) = changes.age_rating {
            game.age_rating = age.clone();
        }
        if let Some(ref link) = changes.igdb_link {
            game.igdb_link = link.clone();
        }
        Ok(game.clone())
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let mut world = self.0.lock();
        let before = world.games.len();
        world.games.retain(|g| g.id != id);
        world.ratings.retain(|r| r.game_id != id);
        world.backlog.retain(|b| b.game_id != id);
        Ok(world.games.len() < before)
    }
}

// ── MockRatingRepo ───────────────────────────────────────────────────────────

pub struct MockRatingRepo(MockDb);

impl RatingRepository for MockRatingRepo {
    async fn find_by_id(&self, id: i32) -> Result<Option<Rating>, ApiError> {
        Ok(self.0.lock().ratings.iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_user_and_game(
        &self,
        user_id: i32,
        game_id: i32,
    ) -> Result<Option<Rating>, ApiError> {
        Ok(self
            .0
            .lock()
            .ratings
            .iter()
            .find(|r| r.user_id == user_id && r.game_id == game_id)
            .cloned())
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<Rating>, ApiError> {
        Ok(page_of(self.0.lock().ratings.iter().cloned(), page))
    }

    async fn list_by_user(&self, user_id: i32) -> Result<Vec<RatedGame>, ApiError> {
        let world = self.0.lock();
        Ok(world
            .ratings
            .iter()
            .filter(|r| r.user_id == user_id)
            .filter_map(|r| {
                let game = world.games.iter().find(|g| g.id == r.game_id)?;
                Some(RatedGame {
                    rating: r.clone(),
                    game: game.clone(),
                })
            })
            .collect())
    }

    async fn list_by_game(&self, game_id: i32) -> Result<Vec<GameRating>, ApiError> {
        let world = self.0.lock();
        let Some(game) = world.games.iter().find(|g| g.id == game_id) else {
            return Ok(vec![]);
        };
        Ok(world
            .ratings
            .iter()
            .filter(|r| r.game_id == game_id)
            .filter_map(|r| {
                let user = world.users.iter().find(|u| u.id == r.user_id)?;
                Some(GameRating {
                    rating: r.clone(),
                    username: user.username.clone(),
                    game: game.clone(),
                })
            })
            .collect())
    }

    async fn list_scores(&self) -> Result<Vec<ScoreEntry>, ApiError> {
        Ok(self
            .0
            .lock()
            .ratings
            .iter()
            .map(|r| ScoreEntry {
                user_id: r.user_id,
                game_id: r.game_id,
                score: r.score.value(),
            })
            .collect())
    }

    async fn create(&self, rating: &NewRating) -> Result<Rating, ApiError> {
        let mut world = self.0.lock();
        if world
            .ratings
            .iter()
            .any(|r| r.user_id == rating.user_id && r.game_id == rating.game_id)
        {
            return Err(ApiError::RatingAlreadyExists);
        }
        let created = Rating {
            id: world.next_id(),
            user_id: rating.user_id,
            game_id: rating.game_id,
            score: rating.score,
            comment: rating.comment.clone(),
            rating_date: rating.rating_date,
            updated_at: None,
        };
        world.ratings.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: i32, changes: &RatingChanges) -> Result<Rating, ApiError> {
        let mut world = self.0.lock();
        let rating = world
            .ratings
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(ApiError::RatingNotFound)?;
        if let Some(score) = changes.score {
            rating.score = score;
        }
        if changes.comment.is_some() {
            rating.comment = changes.comment.clone();
        }
        rating.updated_at = Some(Utc::now());
        Ok(rating.clone())
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let mut world = self.0.lock();
        let before = world.ratings.len();
        world.ratings.retain(|r| r.id != id);
        Ok(world.ratings.len() < before)
    }
}

// ── MockBacklogRepo ──────────────────────────────────────────────────────────

pub struct MockBacklogRepo(MockDb);

impl BacklogRepository for MockBacklogRepo {
    async fn find_by_id(&self, id: i32) -> Result<Option<BacklogItem>, ApiError> {
        Ok(self.0.lock().backlog.iter().find(|b| b.id == id).cloned())
    }

    async fn list_by_user(
        &self,
        user_id: i32,
        page: PageRequest,
    ) -> Result<Vec<BacklogItem>, ApiError> {
        let world = self.0.lock();
        Ok(page_of(
            world.backlog.iter().filter(|b| b.user_id == user_id).cloned(),
            page,
        ))
    }

    async fn list_entries_by_user(&self, user_id: i32) -> Result<Vec<BacklogEntry>, ApiError> {
        let world = self.0.lock();
        Ok(world
            .backlog
            .iter()
            .filter(|b| b.user_id == user_id)
            .filter_map(|b| {
                let game = world.games.iter().find(|g| g.id == b.game_id)?;
                Some(BacklogEntry {
                    item: b.clone(),
                    game_name: game.name.clone(),
                })
            })
            .collect())
    }

    async fn create(&self, item: &NewBacklogItem) -> Result<BacklogItem, ApiError> {
        let mut world = self.0.lock();
        let created = BacklogItem {
            id: world.next_id(),
            user_id: item.user_id,
            game_id: item.game_id,
            status: item.status,
            score: item.score,
            added_date: Utc::now(),
        };
        world.backlog.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: i32, changes: &BacklogChanges) -> Result<BacklogItem, ApiError> {
        let mut world = self.0.lock();
        let item = world
            .backlog
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(ApiError::BacklogItemNotFound)?;
        if let Some(status) = changes.status {
            item.status = status;
        }
        if changes.score.is_some() {
            item.score = changes.score;
        }
        Ok(item.clone())
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let mut world = self.0.lock();
        let before = world.backlog.len();
        world.backlog.retain(|b| b.id != id);
        Ok(world.backlog.len() < before)
    }
}

// ── MockRecommendationStore ──────────────────────────────────────────────────

pub struct MockRecommendationStore(MockDb);

impl RecommendationStore for MockRecommendationStore {
    async fn latest(&self, user_id: i32) -> Result<Option<RecommendationSet>, ApiError> {
        Ok(self.0.lock().recommendations.get(&user_id).cloned())
    }

    async fn replace(&self, user_id: i32, set: &RecommendationSet) -> Result<(), ApiError> {
        self.0.lock().recommendations.insert(user_id, set.clone());
        Ok(())
    }
}

// ── MockCache ────────────────────────────────────────────────────────────────

/// Recommendation cache recording the TTL each entry was written with.
#[derive(Clone, Default)]
pub struct MockCache {
    pub entries: Arc<Mutex<HashMap<i32, (RecommendationSet, u64)>>>,
    pub unavailable: bool,
    /// Reads and deletes work but every write fails.
    pub read_only: bool,
}

impl MockCache {
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }

    /// Place an entry directly, bypassing `read_only`.
    pub fn seed(&self, user_id: i32, set: RecommendationSet, ttl_secs: u64) {
        self.entries.lock().unwrap().insert(user_id, (set, ttl_secs));
    }

    pub fn cached(&self, user_id: i32) -> Option<RecommendationSet> {
        self.entries.lock().unwrap().get(&user_id).map(|(set, _)| set.clone())
    }

    pub fn ttl_of(&self, user_id: i32) -> Option<u64> {
        self.entries.lock().unwrap().get(&user_id).map(|(_, ttl)| *ttl)
    }
}

impl RecommendationCache for MockCache {
    async fn get(&self, user_id: i32) -> Result<Option<RecommendationSet>, ApiError> {
        if self.unavailable {
            return Err(ApiError::Internal(anyhow::anyhow!("redis down")));
        }
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(&user_id)
            .map(|(set, _)| set.clone()))
    }

    async fn set(
        &self,
        user_id: i32,
        set: &RecommendationSet,
        ttl_secs: u64,
    ) -> Result<(), ApiError> {
        if self.unavailable || self.read_only {
            return Err(ApiError::Internal(anyhow::anyhow!("redis down")));
        }
        self.entries
            .lock()
            .unwrap()
            .insert(user_id, (set.clone(), ttl_secs));
        Ok(())
    }

    async fn invalidate(&self, user_id: i32) -> Result<(), ApiError> {
        if self.unavailable {
            return Err(ApiError::Internal(anyhow::anyhow!("redis down")));
        }
        self.entries.lock().unwrap().remove(&user_id);
        Ok(())
    }
}

// ── MockModel ────────────────────────────────────────────────────────────────

/// Canned model reply; `Err` simulates an upstream failure.
#[derive(Clone)]
pub struct MockModel {
    pub reply: Result<String, String>,
    pub prompts: Arc<Mutex<Vec<String>>>,
}

impl MockModel {
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
            prompts: Arc::default(),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
            prompts: Arc::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

impl RecommendationModel for MockModel {
    async fn generate(&self, prompt: &str) -> Result<String, ApiError> {
        self.prompts.lock().unwrap().push(prompt.to_owned());
        self.reply.clone().map_err(ApiError::Upstream)
    }
}

// ── MockCatalog ──────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockCatalog {
    pub hits: Vec<NewGame>,
    pub queries: Arc<Mutex<Vec<String>>>,
}

impl MockCatalog {
    pub fn new(hits: Vec<NewGame>) -> Self {
        Self {
            hits,
            queries: Arc::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

impl GameCatalog for MockCatalog {
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<NewGame>, ApiError> {
        self.queries.lock().unwrap().push(query.to_owned());
        Ok(self.hits.iter().take(limit as usize).cloned().collect())
    }
}

// ── PlainHasher ──────────────────────────────────────────────────────────────

pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    async fn hash(&self, password: &str) -> Result<String, ApiError> {
        Ok(format!("plain:{password}"))
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, ApiError> {
        Ok(hash == format!("plain:{password}"))
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn test_user(id: i32, username: &str) -> User {
    User {
        id,
        username: username.to_owned(),
        email: format!("{username}@example.com"),
        password_hash: "plain:password123".to_owned(),
        user_age: Some(25),
        registration_date: Utc::now(),
        is_admin: false,
    }
}

pub fn test_admin(id: i32, username: &str) -> User {
    User {
        is_admin: true,
        ..test_user(id, username)
    }
}

pub fn test_game(id: i32, name: &str, genre: &str, platform: &str) -> Game {
    Game {
        id,
        name: name.to_owned(),
        genre: genre.to_owned(),
        platform: platform.to_owned(),
        release_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        image_url: String::new(),
        igdb_id: Some(i64::from(id) * 100),
        age_rating: "PEGI 12".to_owned(),
        igdb_link: format!("https://www.igdb.com/games/{}", name.to_lowercase()),
    }
}

pub fn catalog_hit(igdb_id: i64, name: &str) -> NewGame {
    NewGame {
        name: name.to_owned(),
        genre: "Adventure".to_owned(),
        platform: "PC (Microsoft Windows)".to_owned(),
        release_date: NaiveDate::from_ymd_opt(2018, 9, 7).unwrap(),
        image_url: String::new(),
        igdb_id: Some(igdb_id),
        age_rating: "PEGI 7".to_owned(),
        igdb_link: format!("https://www.igdb.com/games/{igdb_id}"),
    }
}
