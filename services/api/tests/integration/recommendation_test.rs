use chrono::{Duration, Utc};

use playnext_api::domain::types::{RecommendationSet, RecommendedGame};
use playnext_api::usecase::recommendation::{
    GetRecommendationsUseCase, NO_RATINGS_DETAIL, UNPARSABLE_DETAIL,
};
use playnext_testing::fixture::Fixture;

use crate::helpers::{
    MockBacklogRepo, MockCache, MockDb, MockModel, MockRatingRepo, MockRecommendationStore,
    test_game, test_user,
};

const TTL: u64 = 3600;

type UseCase =
    GetRecommendationsUseCase<MockRatingRepo, MockBacklogRepo, MockRecommendationStore, MockCache, MockModel>;

fn usecase(db: &MockDb, cache: &MockCache, model: &MockModel) -> UseCase {
    GetRecommendationsUseCase {
        ratings: db.ratings(),
        backlog: db.backlog(),
        store: db.recommendations(),
        cache: cache.clone(),
        model: model.clone(),
        ttl_secs: TTL,
    }
}

/// The model text as Gemini returns it, parts joined.
fn gemini_reply() -> String {
    let body = Fixture::load("gemini/generate_content.json");
    body["candidates"][0]["content"]["parts"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["text"].as_str())
        .collect()
}

fn rated_db() -> MockDb {
    let db = MockDb::new(
        vec![test_user(1, "alice")],
        vec![
            test_game(10, "Celeste", "Platform", "PC"),
            test_game(11, "Hades", "Roguelike", "PC"),
        ],
    );
    db.seed_rating(1, 10, 9.0);
    db
}

fn stored_set(age: Duration) -> RecommendationSet {
    RecommendationSet {
        items: vec![RecommendedGame {
            game_name: "Outer Wilds".into(),
            genre: "Adventure".into(),
            igdb_link: "https://www.igdb.com/games/outer-wilds".into(),
            reasoning: "Exploration".into(),
        }],
        raw_response: None,
        generated_at: Utc::now() - age,
    }
}

#[tokio::test]
async fn should_ask_for_ratings_before_calling_the_model() {
    let db = MockDb::new(vec![test_user(1, "alice")], vec![]);
    let model = MockModel::replying(gemini_reply());

    let out = usecase(&db, &MockCache::default(), &model)
        .execute(1, false)
        .await
        .unwrap();

    assert!(out.items.is_empty());
    assert_eq!(out.detail.as_deref(), Some(NO_RATINGS_DETAIL));
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn should_generate_store_and_cache_on_first_request() {
    let db = rated_db();
    let cache = MockCache::default();
    let model = MockModel::replying(gemini_reply());

    let out = usecase(&db, &cache, &model).execute(1, false).await.unwrap();

    let names: Vec<_> = out.items.iter().map(|g| g.game_name.as_str()).collect();
    assert_eq!(names, ["Hollow Knight", "Disco Elysium", "Hades"]);
    assert_eq!(
        out.items[0].igdb_link,
        "https://www.igdb.com/games/hollow-knight"
    );
    assert!(!out.cached);
    assert!(out.detail.is_none());
    assert!(db.lock().recommendations.contains_key(&1));
    assert_eq!(cache.ttl_of(1), Some(TTL));
    assert!(model.prompts.lock().unwrap()[0].contains("Celeste"));
}

#[tokio::test]
async fn should_drop_suggestions_the_user_already_rated() {
    let db = rated_db();
    db.seed_rating(1, 11, 6.0);
    let model = MockModel::replying(gemini_reply());

    let out = usecase(&db, &MockCache::default(), &model)
        .execute(1, false)
        .await
        .unwrap();

    assert_eq!(out.items.len(), 2);
    assert!(out.items.iter().all(|g| g.game_name != "Hades"));
}

#[tokio::test]
async fn should_serve_second_request_from_cache() {
    let db = rated_db();
    let cache = MockCache::default();
    let model = MockModel::replying(gemini_reply());
    let usecase = usecase(&db, &cache, &model);

    let first = usecase.execute(1, false).await.unwrap();
    let second = usecase.execute(1, false).await.unwrap();

    assert!(second.cached);
    assert_eq!(second.items, first.items);
    assert_eq!(model.calls(), 1);
}

#[tokio::test]
async fn should_replace_stored_and_cached_set_when_forced() {
    let db = rated_db();
    let old = stored_set(Duration::minutes(5));
    db.lock().recommendations.insert(1, old.clone());
    let cache = MockCache::default();
    cache.seed(1, old, TTL);
    let model = MockModel::replying(gemini_reply());
    let usecase = usecase(&db, &cache, &model);

    let forced = usecase.execute(1, true).await.unwrap();
    assert!(!forced.cached);
    assert_eq!(forced.items[0].game_name, "Hollow Knight");
    assert_eq!(db.lock().recommendations[&1].items, forced.items);
    assert_eq!(cache.cached(1).unwrap().items, forced.items);

    let after = usecase.execute(1, false).await.unwrap();
    assert!(after.cached);
    assert_eq!(after.items, forced.items);
    assert_eq!(model.calls(), 1);
}

#[tokio::test]
async fn should_drop_old_cache_entry_when_forced_write_fails() {
    let db = rated_db();
    let old = stored_set(Duration::minutes(5));
    db.lock().recommendations.insert(1, old.clone());
    let cache = MockCache::read_only();
    cache.seed(1, old, TTL);
    let model = MockModel::replying(gemini_reply());
    let usecase = usecase(&db, &cache, &model);

    let forced = usecase.execute(1, true).await.unwrap();
    assert_eq!(forced.items[0].game_name, "Hollow Knight");
    assert!(cache.cached(1).is_none());

    let after = usecase.execute(1, false).await.unwrap();
    assert!(after.cached);
    assert_eq!(after.items[0].game_name, "Hollow Knight");
    assert_eq!(model.calls(), 1);
}

#[tokio::test]
async fn should_serve_fresh_stored_set_and_rewarm_cache() {
    let db = rated_db();
    db.lock()
        .recommendations
        .insert(1, stored_set(Duration::minutes(10)));
    let cache = MockCache::default();
    let model = MockModel::replying(gemini_reply());

    let out = usecase(&db, &cache, &model).execute(1, false).await.unwrap();

    assert!(out.cached);
    assert_eq!(out.items[0].game_name, "Outer Wilds");
    assert_eq!(model.calls(), 0);
    let ttl = cache.ttl_of(1).unwrap();
    assert!((2990..=3000).contains(&ttl), "remaining ttl was {ttl}");
}

#[tokio::test]
async fn should_regenerate_when_stored_set_is_stale() {
    let db = rated_db();
    db.lock()
        .recommendations
        .insert(1, stored_set(Duration::hours(2)));
    let model = MockModel::replying(gemini_reply());

    let out = usecase(&db, &MockCache::default(), &model)
        .execute(1, false)
        .await
        .unwrap();

    assert!(!out.cached);
    assert_eq!(model.calls(), 1);
    assert_eq!(db.lock().recommendations[&1].items, out.items);
}

#[tokio::test]
async fn should_keep_previous_set_when_model_fails() {
    let db = rated_db();
    let previous = stored_set(Duration::minutes(5));
    db.lock().recommendations.insert(1, previous.clone());
    let model = MockModel::failing("quota exceeded");

    let out = usecase(&db, &MockCache::default(), &model)
        .execute(1, true)
        .await
        .unwrap();

    assert!(out.items.is_empty());
    assert!(out.detail.as_deref().unwrap().contains("quota exceeded"));
    assert_eq!(db.lock().recommendations[&1], previous);
}

#[tokio::test]
async fn should_report_unparsable_reply_with_raw_text() {
    let db = rated_db();
    let model = MockModel::replying("I cannot recommend anything today.");

    let out = usecase(&db, &MockCache::default(), &model)
        .execute(1, false)
        .await
        .unwrap();

    assert!(out.items.is_empty());
    assert_eq!(out.detail.as_deref(), Some(UNPARSABLE_DETAIL));
    assert_eq!(
        out.raw_response.as_deref(),
        Some("I cannot recommend anything today.")
    );
    assert!(db.lock().recommendations.is_empty());
}

#[tokio::test]
async fn should_still_generate_when_cache_is_down() {
    let db = rated_db();
    let model = MockModel::replying(gemini_reply());

    let out = usecase(&db, &MockCache::unavailable(), &model)
        .execute(1, false)
        .await
        .unwrap();

    assert_eq!(out.items.len(), 3);
    assert!(db.lock().recommendations.contains_key(&1));
}
