use std::env;

use anyhow::{Context, Result};

const DEFAULT_MATCH_DETAILS_URL: &str =
    "https://api.steampowered.com/IDOTA2Match_570/GetMatchDetails/v001/";
const DEFAULT_PLAYER_SUMMARIES_URL: &str =
    "https://api.steampowered.com/ISteamUser/GetPlayerSummaries/v0002/";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Steam Web API key, shared by both upstream endpoints
    pub steam_api_key: Option<String>,

    /// Seconds a cached match result stays fresh
    pub cache_ttl_secs: u64,

    /// SQLite database path for the result cache
    pub database_url: String,

    /// GetMatchDetails endpoint
    pub match_details_url: String,

    /// GetPlayerSummaries endpoint
    pub player_summaries_url: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Config::default();

        Ok(Config {
            steam_api_key: non_empty(env::var("STEAM_API_KEY").ok()),

            cache_ttl_secs: match env::var("CACHE_TTL_SECS") {
                Ok(value) => value
                    .parse()
                    .context("CACHE_TTL_SECS must be a valid number")?,
                Err(_) => defaults.cache_ttl_secs,
            },

            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),

            match_details_url: env::var("MATCH_DETAILS_URL").unwrap_or(defaults.match_details_url),

            player_summaries_url: env::var("PLAYER_SUMMARIES_URL")
                .unwrap_or(defaults.player_summaries_url),

            request_timeout_secs: match env::var("REQUEST_TIMEOUT_SECS") {
                Ok(value) => value
                    .parse()
                    .context("REQUEST_TIMEOUT_SECS must be a valid number")?,
                Err(_) => defaults.request_timeout_secs,
            },
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            steam_api_key: None,
            cache_ttl_secs: 3600,
            database_url: "sqlite:data/match_cache.db".to_string(),
            match_details_url: DEFAULT_MATCH_DETAILS_URL.to_string(),
            player_summaries_url: DEFAULT_PLAYER_SUMMARIES_URL.to_string(),
            request_timeout_secs: 60,
        }
    }
}

/// Treat blank credentials the same as missing ones
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
