use playnext_api::error::ApiError;
use playnext_api::usecase::backlog::{
    CreateBacklogItemInput, CreateBacklogItemUseCase, DeleteBacklogItemUseCase,
    ListBacklogUseCase, UpdateBacklogItemInput, UpdateBacklogItemUseCase,
};
use playnext_domain::backlog::BacklogStatus;
use playnext_domain::pagination::PageRequest;

use crate::helpers::{MockDb, test_game, test_user};

fn backlog_db() -> MockDb {
    MockDb::new(
        vec![test_user(1, "alice"), test_user(2, "bob")],
        vec![
            test_game(10, "Celeste", "Platform", "PC"),
            test_game(11, "Hades", "Roguelike", "PC"),
        ],
    )
}

fn add(user_id: i32, game_id: i32, status: &str) -> CreateBacklogItemInput {
    CreateBacklogItemInput {
        user_id,
        game_id,
        status: status.into(),
        rating: None,
    }
}

#[tokio::test]
async fn should_add_game_to_own_backlog() {
    let db = backlog_db();
    let usecase = CreateBacklogItemUseCase {
        backlog: db.backlog(),
        games: db.games(),
    };

    let item = usecase
        .execute(&test_user(1, "alice"), add(1, 10, "planning"))
        .await
        .unwrap();

    assert_eq!(item.status, BacklogStatus::Planning);
    assert_eq!(item.score, None);
}

#[tokio::test]
async fn should_forbid_adding_to_someone_elses_backlog() {
    let db = backlog_db();
    let usecase = CreateBacklogItemUseCase {
        backlog: db.backlog(),
        games: db.games(),
    };

    let result = usecase
        .execute(&test_user(1, "alice"), add(2, 10, "planning"))
        .await;

    assert!(matches!(result, Err(ApiError::Forbidden(_))));
    assert!(db.lock().backlog.is_empty());
}

#[tokio::test]
async fn should_reject_unknown_status() {
    let db = backlog_db();
    let usecase = CreateBacklogItemUseCase {
        backlog: db.backlog(),
        games: db.games(),
    };

    let result = usecase
        .execute(&test_user(1, "alice"), add(1, 10, "wishlist"))
        .await;

    assert!(matches!(result, Err(ApiError::Validation(_))));
}

#[tokio::test]
async fn should_require_existing_game_for_backlog() {
    let db = backlog_db();
    let usecase = CreateBacklogItemUseCase {
        backlog: db.backlog(),
        games: db.games(),
    };

    let result = usecase
        .execute(&test_user(1, "alice"), add(1, 77, "playing"))
        .await;

    assert!(matches!(result, Err(ApiError::GameNotFound)));
}

#[tokio::test]
async fn should_list_only_callers_items() {
    let db = backlog_db();
    let create = CreateBacklogItemUseCase {
        backlog: db.backlog(),
        games: db.games(),
    };
    create
        .execute(&test_user(1, "alice"), add(1, 10, "playing"))
        .await
        .unwrap();
    create
        .execute(&test_user(2, "bob"), add(2, 11, "dropped"))
        .await
        .unwrap();

    let items = ListBacklogUseCase { repo: db.backlog() }
        .execute(1, PageRequest::default())
        .await
        .unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].game_id, 10);
}

#[tokio::test]
async fn should_update_status_and_score() {
    let db = backlog_db();
    let alice = test_user(1, "alice");
    let item = CreateBacklogItemUseCase {
        backlog: db.backlog(),
        games: db.games(),
    }
    .execute(&alice, add(1, 10, "playing"))
    .await
    .unwrap();

    let updated = UpdateBacklogItemUseCase { repo: db.backlog() }
        .execute(
            &alice,
            item.id,
            UpdateBacklogItemInput {
                status: Some("completed".into()),
                rating: Some(9.0),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.status, BacklogStatus::Completed);
    assert_eq!(updated.score.map(|s| s.value()), Some(9.0));
    assert_eq!(updated.added_date, item.added_date);
}

#[tokio::test]
async fn should_not_let_others_delete_an_item() {
    let db = backlog_db();
    let item = CreateBacklogItemUseCase {
        backlog: db.backlog(),
        games: db.games(),
    }
    .execute(&test_user(1, "alice"), add(1, 10, "on_hold"))
    .await
    .unwrap();
    let usecase = DeleteBacklogItemUseCase { repo: db.backlog() };

    let result = usecase.execute(&test_user(2, "bob"), item.id).await;
    assert!(matches!(result, Err(ApiError::Forbidden(_))));

    let deleted = usecase
        .execute(&test_user(1, "alice"), item.id)
        .await
        .unwrap();
    assert_eq!(deleted.id, item.id);
    assert!(matches!(
        usecase.execute(&test_user(1, "alice"), item.id).await,
        Err(ApiError::BacklogItemNotFound)
    ));
}
