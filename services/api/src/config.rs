use serde::Deserialize;

use playnext_core::config::Config;

/// API service configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    #[serde(default = "default_redis_url")]
    pub redis_url: String,
    /// HMAC secret for access tokens. Env var: `SECRET_KEY`.
    pub secret_key: String,
    #[serde(default = "default_access_token_expire_minutes")]
    pub access_token_expire_minutes: u64,

    pub gemini_api_key: String,
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,
    #[serde(default = "default_gemini_api_url")]
    pub gemini_api_url: String,

    pub igdb_client_id: String,
    pub igdb_client_secret: String,
    /// Preset app access token; fetched from Twitch on first use when absent.
    #[serde(default)]
    pub igdb_app_access_token: Option<String>,
    #[serde(default = "default_igdb_api_url")]
    pub igdb_api_url: String,
    #[serde(default = "default_twitch_token_url")]
    pub twitch_token_url: String,

    /// How long a generated recommendation set is served before regenerating.
    #[serde(default = "default_recommendation_ttl_secs")]
    pub recommendation_ttl_secs: u64,
    /// TCP port for the HTTP server (default 8000). Env var: `API_PORT`.
    #[serde(default = "default_api_port")]
    pub api_port: u16,
}

impl Config for ApiConfig {}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_owned()
}

fn default_access_token_expire_minutes() -> u64 {
    30
}

fn default_gemini_model() -> String {
    "gemini-1.5-pro-latest".to_owned()
}

fn default_gemini_api_url() -> String {
    "https://generativelanguage.googleapis.com".to_owned()
}

fn default_igdb_api_url() -> String {
    "https://api.igdb.com/v4".to_owned()
}

fn default_twitch_token_url() -> String {
    "https://id.twitch.tv/oauth2/token".to_owned()
}

fn default_recommendation_ttl_secs() -> u64 {
    86_400
}

fn default_api_port() -> u16 {
    8000
}
