use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use playnext_domain::backlog::BacklogStatus;
use playnext_domain::score::Score;

pub const MIN_PASSWORD_LEN: usize = 8;

// ── Users ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub user_age: Option<i32>,
    pub registration_date: DateTime<Utc>,
    pub is_admin: bool,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub user_age: Option<i32>,
}

/// Partial profile update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub user_age: Option<i32>,
}

// ── Games ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub id: i32,
    pub name: String,
    pub genre: String,
    pub platform: String,
    pub release_date: NaiveDate,
    pub image_url: String,
    pub igdb_id: Option<i64>,
    pub age_rating: String,
    pub igdb_link: String,
}

/// A game as described by the catalog, before it has a local id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGame {
    pub name: String,
    pub genre: String,
    pub platform: String,
    pub release_date: NaiveDate,
    pub image_url: String,
    pub igdb_id: Option<i64>,
    pub age_rating: String,
    pub igdb_link: String,
}

#[derive(Debug, Clone, Default)]
pub struct GameChanges {
    pub name: Option<String>,
    pub genre: Option<String>,
    pub platform: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub image_url: Option<String>,
    pub age_rating: Option<String>,
    pub igdb_link: Option<String>,
}

/// Case-insensitive substring filters for the game listing.
#[derive(Debug, Clone, Default)]
pub struct GameFilter {
    pub genre: Option<String>,
    pub platform: Option<String>,
}

// ── Ratings ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Rating {
    pub id: i32,
    pub user_id: i32,
    pub game_id: i32,
    pub score: Score,
    pub comment: Option<String>,
    pub rating_date: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewRating {
    pub user_id: i32,
    pub game_id: i32,
    pub score: Score,
    pub comment: Option<String>,
    pub rating_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct RatingChanges {
    pub score: Option<Score>,
    pub comment: Option<String>,
}

/// A rating joined with the game it is for.
#[derive(Debug, Clone)]
pub struct RatedGame {
    pub rating: Rating,
    pub game: Game,
}

/// A rating on a game's page, joined with its author and the game.
#[derive(Debug, Clone)]
pub struct GameRating {
    pub rating: Rating,
    pub username: String,
    pub game: Game,
}

/// One `(user, game, score)` triple, the input of collaborative filtering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreEntry {
    pub user_id: i32,
    pub game_id: i32,
    pub score: f64,
}

// ── Backlog ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct BacklogItem {
    pub id: i32,
    pub user_id: i32,
    pub game_id: i32,
    pub status: BacklogStatus,
    pub score: Option<Score>,
    pub added_date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBacklogItem {
    pub user_id: i32,
    pub game_id: i32,
    pub status: BacklogStatus,
    pub score: Option<Score>,
}

#[derive(Debug, Clone, Default)]
pub struct BacklogChanges {
    pub status: Option<BacklogStatus>,
    pub score: Option<Score>,
}

#[derive(Debug, Clone)]
pub struct BacklogEntry {
    pub item: BacklogItem,
    pub game_name: String,
}

// ── Recommendations ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedGame {
    pub game_name: String,
    pub genre: String,
    pub igdb_link: String,
    pub reasoning: String,
}

/// A generated recommendation list, as stored in the database and in Redis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationSet {
    pub items: Vec<RecommendedGame>,
    pub raw_response: Option<String>,
    pub generated_at: DateTime<Utc>,
}

// ── Validation ───────────────────────────────────────────────────────────────

/// Loose shape check: one `@`, non-empty local part, dotted domain, no spaces.
pub fn validate_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

pub fn validate_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

pub fn validate_username(username: &str) -> bool {
    let len = username.chars().count();
    (1..=50).contains(&len) && !username.chars().any(char::is_whitespace)
}
