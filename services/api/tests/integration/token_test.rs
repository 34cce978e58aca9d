use playnext_api::error::ApiError;
use playnext_api::extract::resolve_user;
use playnext_api::usecase::token::{LoginInput, LoginUseCase, TOKEN_TYPE, issue_access_token};
use playnext_api::usecase::user::{
    RegisterUserInput, RegisterUserUseCase, UpdateUserInput, UpdateUserUseCase,
};
use playnext_auth_types::identity::BearerIdentity;
use playnext_auth_types::token::{TokenInfo, validate_access_token};

use crate::helpers::{MockDb, PlainHasher, TEST_JWT_SECRET, test_user};

fn login(db: &MockDb) -> LoginUseCase<crate::helpers::MockUserRepo, PlainHasher> {
    LoginUseCase {
        users: db.users(),
        hasher: PlainHasher,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        token_ttl_minutes: 30,
    }
}

fn decode_claims(token: &str) -> TokenInfo {
    validate_access_token(token, TEST_JWT_SECRET).unwrap()
}

#[tokio::test]
async fn should_issue_bearer_token_for_valid_credentials() {
    let db = MockDb::new(vec![test_user(1, "alice")], vec![]);

    let output = login(&db)
        .execute(LoginInput {
            username: "alice".into(),
            password: "password123".into(),
        })
        .await
        .unwrap();

    assert_eq!(output.token_type, TOKEN_TYPE);
    let claims = decode_claims(&output.access_token);
    assert_eq!(claims.username, "alice");
    assert_eq!(claims.user_id, Some(1));
    assert_eq!(claims.exp, output.expires_at);
}

#[tokio::test]
async fn should_reject_wrong_password() {
    let db = MockDb::new(vec![test_user(1, "alice")], vec![]);

    let result = login(&db)
        .execute(LoginInput {
            username: "alice".into(),
            password: "wrong-password".into(),
        })
        .await;

    assert!(
        matches!(result, Err(ApiError::IncorrectCredentials)),
        "expected IncorrectCredentials, got {result:?}"
    );
}

#[tokio::test]
async fn should_not_distinguish_unknown_user_from_wrong_password() {
    let db = MockDb::empty();

    let result = login(&db)
        .execute(LoginInput {
            username: "ghost".into(),
            password: "password123".into(),
        })
        .await;

    assert!(matches!(result, Err(ApiError::IncorrectCredentials)));
}

#[test]
fn should_expire_after_configured_minutes() {
    let (token, exp) = issue_access_token("bob", 2, TEST_JWT_SECRET, 5).unwrap();
    let claims = decode_claims(&token);
    assert_eq!(claims.exp, exp);

    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs();
    assert!(exp >= now + 5 * 60 - 2 && exp <= now + 5 * 60 + 2);
}

// ── Token subject resolution ─────────────────────────────────────────────────

fn identity_of(token: &str) -> BearerIdentity {
    let info = decode_claims(token);
    BearerIdentity {
        username: info.username,
        user_id: info.user_id,
    }
}

#[tokio::test]
async fn should_follow_user_through_rename() {
    let alice = test_user(1, "alice");
    let db = MockDb::new(vec![alice.clone()], vec![]);
    let output = login(&db)
        .execute(LoginInput {
            username: "alice".into(),
            password: "password123".into(),
        })
        .await
        .unwrap();

    UpdateUserUseCase {
        users: db.users(),
        hasher: PlainHasher,
    }
    .execute(
        &alice,
        1,
        UpdateUserInput {
            username: Some("alicia".into()),
            ..UpdateUserInput::default()
        },
    )
    .await
    .unwrap();
    let newcomer = RegisterUserUseCase {
        users: db.users(),
        hasher: PlainHasher,
    }
    .execute(RegisterUserInput {
        username: "alice".into(),
        email: "new-alice@example.com".into(),
        password: "password123".into(),
        user_age: None,
    })
    .await
    .unwrap();

    let user = resolve_user(&db.users(), &identity_of(&output.access_token))
        .await
        .unwrap();
    assert_eq!(user.id, 1);
    assert_eq!(user.username, "alicia");
    assert_ne!(user.id, newcomer.id);
}

#[tokio::test]
async fn should_reject_token_of_deleted_user() {
    let db = MockDb::new(vec![test_user(1, "alice")], vec![]);
    let (token, _) = issue_access_token("alice", 1, TEST_JWT_SECRET, 5).unwrap();
    db.lock().users.clear();

    let result = resolve_user(&db.users(), &identity_of(&token)).await;

    assert!(matches!(result, Err(ApiError::Unauthorized(_))));
}

#[tokio::test]
async fn should_resolve_by_username_without_user_id() {
    let db = MockDb::new(vec![test_user(1, "alice")], vec![]);
    let identity = BearerIdentity {
        username: "alice".into(),
        user_id: None,
    };

    let user = resolve_user(&db.users(), &identity).await.unwrap();

    assert_eq!(user.id, 1);
}
