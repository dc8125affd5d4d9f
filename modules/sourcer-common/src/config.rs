use std::env;

use crate::types::Thresholds;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Apify
    pub apify_api_token: String,

    // Google Sheets
    pub sheets_token: String,
    pub spreadsheet_id: String,

    // Qualification
    pub thresholds: Thresholds,

    // Enrichment fan-out (bounded worker count)
    pub concurrency: usize,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        let defaults = Thresholds::default();
        Self {
            apify_api_token: required_env("APIFY_API_TOKEN"),
            sheets_token: required_env("GOOGLE_SHEETS_TOKEN"),
            spreadsheet_id: required_env("SPREADSHEET_ID"),
            thresholds: Thresholds {
                min_followers: parsed_env("MIN_FOLLOWERS", defaults.min_followers),
                min_posts: parsed_env("MIN_POSTS", defaults.min_posts),
                min_engagement: parsed_env("MIN_ENGAGEMENT", defaults.min_engagement),
            },
            concurrency: parsed_env("SCOUT_CONCURRENCY", 4),
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}

fn parsed_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{key} must be a number")),
        Err(_) => default,
    }
}
