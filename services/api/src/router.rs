use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use playnext_core::health::{healthz, readyz};
use playnext_core::middleware::{cors_layer, propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    backlog::{
        create_backlog_item, delete_backlog_item, get_backlog_item, list_backlog,
        update_backlog_item,
    },
    game::{
        create_game, delete_game, get_game, list_game_ratings, list_games, search_games,
        update_game,
    },
    rating::{
        create_my_rating, create_rating, delete_rating, get_rating, list_my_ratings,
        list_ratings, update_rating,
    },
    recommendation::{get_prediction, get_recommendations},
    token::create_token,
    user::{
        delete_me, delete_user, get_me, get_user, list_users, register, update_me, update_user,
    },
};
use crate::state::AppState;

/// Register `path` and `path/` with the same handlers.
fn collection(
    router: Router<AppState>,
    path: &str,
    method_router: axum::routing::MethodRouter<AppState>,
) -> Router<AppState> {
    router
        .route(path, method_router.clone())
        .route(&format!("{path}/"), method_router)
}

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Auth
        .route("/auth/token", post(create_token))
        // Users
        .route("/users/me", get(get_me).put(update_me).delete(delete_me))
        .route("/users/me/predictions/{game_id}", get(get_prediction))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        // Games
        .route(
            "/games/{id}",
            get(get_game).put(update_game).delete(delete_game),
        )
        .route("/games/{id}/ratings", get(list_game_ratings))
        .route("/games/search/{query}", get(search_games))
        // Ratings
        .route(
            "/ratings/{id}",
            get(get_rating).put(update_rating).delete(delete_rating),
        )
        // Backlog
        .route(
            "/backlog/{id}",
            get(get_backlog_item)
                .put(update_backlog_item)
                .delete(delete_backlog_item),
        );

    let router = collection(router, "/users", get(list_users).post(register));
    let router = collection(
        router,
        "/users/me/ratings",
        get(list_my_ratings).post(create_my_rating),
    );
    let router = collection(router, "/users/me/backlog", get(list_backlog));
    let router = collection(router, "/users/me/recommendations", get(get_recommendations));
    let router = collection(router, "/games", get(list_games).post(create_game));
    let router = collection(router, "/ratings", get(list_ratings).post(create_rating));
    let router = collection(
        router,
        "/backlog",
        get(list_backlog).post(create_backlog_item),
    );

    router
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id_layer())
        .layer(request_id_layer())
        .layer(cors_layer())
        .with_state(state)
}
