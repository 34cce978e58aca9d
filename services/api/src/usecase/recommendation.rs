//! Recommendation generation: taste profile → prompt → model → parsed suggestions.
//!
//! Served from Redis, then from the newest stored set younger than the TTL,
//! unless the caller forces a fresh generation. A failed or unparsable
//! generation yields an empty list plus a `detail` and leaves the stored set
//! untouched.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::repository::{
    BacklogRepository, RatingRepository, RecommendationCache, RecommendationModel,
    RecommendationStore,
};
use crate::domain::types::{BacklogEntry, RatedGame, RecommendationSet, RecommendedGame};
use crate::error::ApiError;
use playnext_domain::backlog::BacklogStatus;

pub const NO_RATINGS_DETAIL: &str =
    "You haven't rated any games yet. Rate more games to get suggestions.";
pub const UNPARSABLE_DETAIL: &str =
    "The recommendation model returned a response that could not be parsed.";
pub const RECOMMENDATION_COUNT: usize = 3;

// ── Taste profile ────────────────────────────────────────────────────────────

#[derive(Debug, Default, PartialEq)]
pub struct TasteProfile {
    pub favourites: Vec<String>,
    pub backlog: Vec<String>,
    pub dislikes: Vec<String>,
    /// `name: score/10 (comment)`, one per rating.
    pub rating_lines: Vec<String>,
}

fn push_unique(list: &mut Vec<String>, name: &str) {
    if !list.iter().any(|n| n == name) {
        list.push(name.to_owned());
    }
}

pub fn build_taste_profile(ratings: &[RatedGame], backlog: &[BacklogEntry]) -> TasteProfile {
    let mut profile = TasteProfile::default();

    // game id → (name, sum, count), in first-seen order
    let mut averages: Vec<(i32, &str, f64, u32)> = Vec::new();
    for rated in ratings {
        let score = rated.rating.score.value();
        match averages.iter_mut().find(|(id, ..)| *id == rated.game.id) {
            Some(entry) => {
                entry.2 += score;
                entry.3 += 1;
            }
            None => averages.push((rated.game.id, &rated.game.name, score, 1)),
        }
        let line = match rated.rating.comment.as_deref().filter(|c| !c.trim().is_empty()) {
            Some(comment) => format!("{}: {}/10 ({})", rated.game.name, score, comment.trim()),
            None => format!("{}: {}/10", rated.game.name, score),
        };
        profile.rating_lines.push(line);
    }
    for (_, name, sum, count) in averages {
        let avg = sum / f64::from(count);
        if avg >= 8.0 {
            push_unique(&mut profile.favourites, name);
        } else if avg <= 4.0 {
            push_unique(&mut profile.dislikes, name);
        }
    }

    for entry in backlog {
        let name = entry.game_name.as_str();
        match entry.item.status {
            BacklogStatus::Completed | BacklogStatus::Playing => {
                push_unique(&mut profile.favourites, name)
            }
            BacklogStatus::Dropped => push_unique(&mut profile.dislikes, name),
            BacklogStatus::OnHold | BacklogStatus::Planning => {}
        }
        if let Some(score) = entry.item.score {
            if score.is_favourite() {
                push_unique(&mut profile.favourites, name);
            } else if score.is_disliked() {
                push_unique(&mut profile.dislikes, name);
            }
        }
        push_unique(&mut profile.backlog, name);
    }

    profile
}

fn join_or(names: &[String], fallback: &str) -> String {
    if names.is_empty() {
        fallback.to_owned()
    } else {
        names.join(", ")
    }
}

pub fn build_prompt(profile: &TasteProfile) -> String {
    let ratings = if profile.rating_lines.is_empty() {
        "- none".to_owned()
    } else {
        profile
            .rating_lines
            .iter()
            .map(|l| format!("- {l}"))
            .collect::<Vec<_>>()
            .join("\n")
    };
    format!(
        r#"The user's favorite games are: {favourites}.
The user's backlog contains: {backlog}.
The user dislikes: {dislikes}.
The user's ratings:
{ratings}

Based on the user's preferences, recommend {count} games the user has not rated and does not have in their backlog.
For each recommendation, include:
- "name": The game's name.
- "genre": A primary genre for the game.
- "igdb_link": A direct link to the game on IGDB (e.g., "https://www.igdb.com/games/game-name").
- "reasoning": A short, clear reason why this game is recommended based on the user's preferences.

Provide the recommendations as a JSON array inside a ```json code block. Ensure the JSON is valid and can be parsed directly.
Example:
```json
[
  {{
    "name": "Game Title 1",
    "genre": "RPG",
    "igdb_link": "https://www.igdb.com/games/game-title-1",
    "reasoning": "Because you enjoyed similar RPGs like X and Y."
  }}
]
```"#,
        favourites = join_or(&profile.favourites, "no specific favorite games"),
        backlog = join_or(&profile.backlog, "no games in their backlog"),
        dislikes = join_or(&profile.dislikes, "no specific disliked games"),
        count = RECOMMENDATION_COUNT,
    )
}

// ── Response parsing ─────────────────────────────────────────────────────────

/// Locate the JSON payload: first ```json fence, else any fence, else bare `[...]` text.
pub fn extract_json_block(text: &str) -> Option<&str> {
    if let Some(start) = text.find("```json") {
        let body = &text[start + "```json".len()..];
        let end = body.find("```")?;
        return Some(body[..end].trim());
    }
    if let Some(start) = text.find("```") {
        let body = &text[start + 3..];
        let end = body.find("```")?;
        let block = &body[..end];
        // drop an info string such as ```javascript
        let block = match block.split_once('\n') {
            Some((first, rest)) if !first.trim_start().starts_with(['[', '{']) => rest,
            _ => block,
        };
        return Some(block.trim());
    }
    let trimmed = text.trim();
    trimmed.starts_with('[').then_some(trimmed)
}

/// `[url](url)` → `url`; anything else passes through trimmed.
pub fn clean_link(link: &str) -> String {
    let link = link.trim();
    if link.starts_with('[') && link.ends_with(')') {
        if let Some(open) = link.find("](") {
            return link[open + 2..link.len() - 1].trim().to_owned();
        }
    }
    link.to_owned()
}

fn non_empty_str<'a>(item: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|k| item.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
}

/// Parse the model reply into suggestions. `known` holds lowercased names of
/// games the user already rated or has in the backlog; those are dropped.
///
/// Returns `None` when no complete suggestion survives.
pub fn parse_recommendations(text: &str, known: &HashSet<String>) -> Option<Vec<RecommendedGame>> {
    let block = extract_json_block(text)?;
    let value: Value = match serde_json::from_str(block) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "model reply is not valid JSON");
            return None;
        }
    };
    let Some(items) = value.as_array() else {
        tracing::warn!("model reply JSON is not an array");
        return None;
    };

    let games: Vec<RecommendedGame> = items
        .iter()
        .filter_map(|item| {
            let parsed = RecommendedGame {
                game_name: non_empty_str(item, &["name", "title", "game_name"])?.to_owned(),
                genre: non_empty_str(item, &["genre"])?.to_owned(),
                igdb_link: clean_link(non_empty_str(item, &["igdb_link"])?),
                reasoning: non_empty_str(item, &["reasoning"])?.to_owned(),
            };
            Some(parsed)
        })
        .filter(|game| !known.contains(&game.game_name.to_lowercase()))
        .collect();

    (!games.is_empty()).then_some(games)
}

// ── GetRecommendations ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationOutput {
    pub items: Vec<RecommendedGame>,
    pub raw_response: Option<String>,
    pub detail: Option<String>,
    pub generated_at: Option<DateTime<Utc>>,
    pub cached: bool,
}

impl RecommendationOutput {
    fn empty(detail: impl Into<String>, raw_response: Option<String>) -> Self {
        Self {
            items: Vec::new(),
            raw_response,
            detail: Some(detail.into()),
            generated_at: None,
            cached: false,
        }
    }

    fn from_set(set: RecommendationSet, cached: bool) -> Self {
        Self {
            items: set.items,
            raw_response: set.raw_response,
            detail: None,
            generated_at: Some(set.generated_at),
            cached,
        }
    }
}

pub struct GetRecommendationsUseCase<R, B, S, C, M>
where
    R: RatingRepository,
    B: BacklogRepository,
    S: RecommendationStore,
    C: RecommendationCache,
    M: RecommendationModel,
{
    pub ratings: R,
    pub backlog: B,
    pub store: S,
    pub cache: C,
    pub model: M,
    pub ttl_secs: u64,
}

impl<R, B, S, C, M> GetRecommendationsUseCase<R, B, S, C, M>
where
    R: RatingRepository,
    B: BacklogRepository,
    S: RecommendationStore,
    C: RecommendationCache,
    M: RecommendationModel,
{
    pub async fn execute(
        &self,
        user_id: i32,
        force_generate: bool,
    ) -> Result<RecommendationOutput, ApiError> {
        let ratings = self.ratings.list_by_user(user_id).await?;
        if ratings.is_empty() {
            return Ok(RecommendationOutput::empty(NO_RATINGS_DETAIL, None));
        }

        if !force_generate {
            if let Some(set) = self.lookup(user_id).await? {
                return Ok(RecommendationOutput::from_set(set, true));
            }
        }

        let backlog = self.backlog.list_entries_by_user(user_id).await?;
        let prompt = build_prompt(&build_taste_profile(&ratings, &backlog));

        let text = match self.model.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(user_id, error = %e, "recommendation model call failed");
                return Ok(RecommendationOutput::empty(
                    format!("Recommendation service unavailable: {e}"),
                    None,
                ));
            }
        };

        let known: HashSet<String> = ratings
            .iter()
            .map(|r| r.game.name.to_lowercase())
            .chain(backlog.iter().map(|b| b.game_name.to_lowercase()))
            .collect();
        let Some(items) = parse_recommendations(&text, &known) else {
            tracing::warn!(user_id, "unparsable recommendation reply");
            return Ok(RecommendationOutput::empty(UNPARSABLE_DETAIL, Some(text)));
        };

        let set = RecommendationSet {
            items,
            raw_response: Some(text),
            generated_at: Utc::now(),
        };
        // a cached set must never outlive the stored one it was taken from
        if let Err(e) = self.cache.invalidate(user_id).await {
            tracing::warn!(user_id, error = %e, "failed to invalidate recommendation cache");
        }
        self.store.replace(user_id, &set).await?;
        if let Err(e) = self.cache.set(user_id, &set, self.ttl_secs).await {
            tracing::warn!(user_id, error = %e, "failed to cache recommendations");
            if let Err(e) = self.cache.invalidate(user_id).await {
                tracing::warn!(user_id, error = %e, "failed to invalidate recommendation cache");
            }
        }
        tracing::info!(user_id, count = set.items.len(), "recommendations generated");
        Ok(RecommendationOutput::from_set(set, false))
    }

    /// Redis first, then the newest stored set if it is still fresh.
    async fn lookup(&self, user_id: i32) -> Result<Option<RecommendationSet>, ApiError> {
        match self.cache.get(user_id).await {
            Ok(Some(set)) => return Ok(Some(set)),
            Ok(None) => {}
            Err(e) => tracing::warn!(user_id, error = %e, "recommendation cache read failed"),
        }

        let Some(set) = self.store.latest(user_id).await? else {
            return Ok(None);
        };
        let age = Utc::now().signed_duration_since(set.generated_at);
        if age.num_seconds() < 0 || age.num_seconds() as u64 >= self.ttl_secs {
            return Ok(None);
        }
        let remaining = self.ttl_secs - age.num_seconds() as u64;
        if let Err(e) = self.cache.set(user_id, &set, remaining).await {
            tracing::warn!(user_id, error = %e, "failed to re-warm recommendation cache");
        }
        Ok(Some(set))
    }
}
