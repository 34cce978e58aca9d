//! IGDB catalog client.
//!
//! Authenticates with a Twitch app access token (client-credentials flow),
//! kept in memory and refreshed once when IGDB answers 401.

use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::{Client as HttpClient, StatusCode};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::domain::repository::GameCatalog;
use crate::domain::types::NewGame;
use crate::error::ApiError;

const SEARCH_FIELDS: &str =
    "name,url,genres.name,platforms.name,cover.url,age_ratings.rating,release_dates.human";
const UNKNOWN_NAME: &str = "Unknown Game";
const RELEASE_DATE_FORMAT: &str = "%b %d, %Y";

#[derive(Clone)]
pub struct IgdbClient {
    http: HttpClient,
    client_id: String,
    client_secret: String,
    api_url: String,
    token_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl IgdbClient {
    pub fn new(
        http: HttpClient,
        client_id: String,
        client_secret: String,
        api_url: String,
        token_url: String,
        preset_token: Option<String>,
    ) -> Self {
        Self {
            http,
            client_id,
            client_secret,
            api_url: api_url.trim_end_matches('/').to_owned(),
            token_url,
            token: Arc::new(RwLock::new(preset_token.filter(|t| !t.is_empty()))),
        }
    }

    async fn access_token(&self) -> Result<String, ApiError> {
        if let Some(token) = self.token.read().await.as_ref() {
            return Ok(token.clone());
        }
        self.refresh_token().await
    }

    async fn refresh_token(&self) -> Result<String, ApiError> {
        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: String,
        }

        let response = self
            .http
            .post(&self.token_url)
            .query(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await
            .map_err(|e| upstream("Twitch token request failed", e))?;
        if !response.status().is_success() {
            return Err(ApiError::Upstream(format!(
                "Twitch token endpoint returned {}",
                response.status()
            )));
        }
        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| upstream("invalid Twitch token response", e))?;

        *self.token.write().await = Some(body.access_token.clone());
        tracing::info!("refreshed IGDB app access token");
        Ok(body.access_token)
    }

    async fn post_games(&self, token: &str, query: &str) -> Result<reqwest::Response, ApiError> {
        self.http
            .post(format!("{}/games", self.api_url))
            .header("Client-ID", &self.client_id)
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/json")
            .body(query.to_owned())
            .send()
            .await
            .map_err(|e| upstream("IGDB request failed", e))
    }
}

impl GameCatalog for IgdbClient {
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<NewGame>, ApiError> {
        let body = search_query(query, limit);
        let token = self.access_token().await?;
        let mut response = self.post_games(&token, &body).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!("IGDB rejected access token, refreshing");
            let token = self.refresh_token().await?;
            response = self.post_games(&token, &body).await?;
        }

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::warn!(%status, detail, "IGDB search failed");
            return Err(ApiError::Upstream(format!("IGDB returned {status}")));
        }

        let games: Vec<IgdbGame> = response
            .json()
            .await
            .map_err(|e| upstream("invalid IGDB response", e))?;
        tracing::debug!(query, hits = games.len(), "IGDB search");
        Ok(games.into_iter().map(map_igdb_game).collect())
    }
}

fn upstream(what: &str, err: reqwest::Error) -> ApiError {
    ApiError::Upstream(format!("{what}: {err}"))
}

/// Apicalypse body for a name search. Quotes and backslashes are escaped.
fn search_query(query: &str, limit: u32) -> String {
    let escaped = query.replace('\\', "\\\\").replace('"', "\\\"");
    format!("search \"{escaped}\"; fields {SEARCH_FIELDS}; limit {limit};")
}

// ── Wire types ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct IgdbGame {
    id: Option<i64>,
    name: Option<String>,
    url: Option<String>,
    cover: Option<IgdbCover>,
    #[serde(default)]
    genres: Vec<IgdbNamed>,
    #[serde(default)]
    platforms: Vec<IgdbNamed>,
    #[serde(default)]
    age_ratings: Vec<IgdbAgeRating>,
    #[serde(default)]
    release_dates: Vec<IgdbReleaseDate>,
}

#[derive(Debug, Deserialize)]
struct IgdbCover {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IgdbNamed {
    name: String,
}

#[derive(Debug, Deserialize)]
struct IgdbAgeRating {
    rating: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct IgdbReleaseDate {
    human: Option<String>,
}

// ── Mapping ──────────────────────────────────────────────────────────────────

fn age_rating_label(id: i64) -> Option<&'static str> {
    let label = match id {
        1 => "3",
        2 => "7",
        3 => "12",
        4 => "16",
        5 => "18",
        6 => "RP",
        7 => "EC",
        8 => "E",
        9 => "E10+",
        10 => "T",
        11 => "M",
        12 => "AO",
        13 => "CUSA",
        14 => "PEGI 3",
        15 => "PEGI 7",
        16 => "PEGI 12",
        17 => "PEGI 16",
        18 => "PEGI 18",
        19 => "ACB E",
        20 => "ACB PG",
        21 => "ACB M",
        22 => "ACB MA15+",
        23 => "ACB AV15+",
        24 => "ACB R18+",
        25 => "ACB RC",
        _ => return None,
    };
    Some(label)
}

fn cover_url(raw: &str) -> String {
    let url = raw.replace("t_thumb", "t_cover_big");
    if url.starts_with("//") {
        format!("https:{url}")
    } else {
        url
    }
}

fn default_release_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default()
}

fn join_names(items: &[IgdbNamed]) -> String {
    items
        .iter()
        .map(|n| n.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn map_igdb_game(game: IgdbGame) -> NewGame {
    let release_date = game
        .release_dates
        .first()
        .and_then(|d| d.human.as_deref())
        .and_then(|human| {
            NaiveDate::parse_from_str(human, RELEASE_DATE_FORMAT)
                .inspect_err(|_| tracing::debug!(human, "unparsable IGDB release date"))
                .ok()
        })
        .unwrap_or_else(default_release_date);

    // Labels compare as strings, so "PEGI 18" outranks "M".
    let age_rating = game
        .age_ratings
        .iter()
        .filter_map(|r| r.rating.and_then(age_rating_label))
        .max()
        .unwrap_or_default()
        .to_owned();

    NewGame {
        name: game.name.unwrap_or_else(|| UNKNOWN_NAME.to_owned()),
        genre: join_names(&game.genres),
        platform: join_names(&game.platforms),
        release_date,
        image_url: game
            .cover
            .and_then(|c| c.url)
            .map(|u| cover_url(&u))
            .unwrap_or_default(),
        igdb_id: game.id,
        age_rating,
        igdb_link: game.url.unwrap_or_default(),
    }
}
