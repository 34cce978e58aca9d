use std::time::Duration;

use clap::Parser;
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing::info;

use playnext_api::config::ApiConfig;
use playnext_api::infra::gemini::GeminiClient;
use playnext_api::infra::igdb::IgdbClient;
use playnext_api::infra::password::BcryptHasher;
use playnext_api::router::build_router;
use playnext_api::state::AppState;
use playnext_api_migration::Migrator;
use playnext_auth_types::identity::JwtSecret;
use playnext_core::config::Config;
use playnext_core::tracing::init_tracing;

#[derive(Parser)]
#[command(about = "PlayNext HTTP API")]
struct Args {
    /// Apply pending database migrations before serving.
    #[arg(long, env = "PLAYNEXT_MIGRATE")]
    migrate: bool,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();
    let args = Args::parse();

    let config = ApiConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    if args.migrate {
        Migrator::up(&db, None)
            .await
            .expect("failed to apply migrations");
        info!("database migrations applied");
    }

    let redis_cfg = deadpool_redis::Config::from_url(&config.redis_url);
    let redis = redis_cfg
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .expect("failed to create Redis pool");

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(60))
        .build()
        .expect("failed to build HTTP client");

    let igdb = IgdbClient::new(
        http.clone(),
        config.igdb_client_id,
        config.igdb_client_secret,
        config.igdb_api_url,
        config.twitch_token_url,
        config.igdb_app_access_token,
    );
    let gemini = GeminiClient::new(
        http,
        config.gemini_api_key,
        config.gemini_model,
        config.gemini_api_url,
    );

    let state = AppState {
        db,
        redis,
        jwt_secret: JwtSecret::new(config.secret_key),
        access_token_expire_minutes: config.access_token_expire_minutes,
        recommendation_ttl_secs: config.recommendation_ttl_secs,
        igdb,
        gemini,
        hasher: BcryptHasher::default(),
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.api_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("api service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
