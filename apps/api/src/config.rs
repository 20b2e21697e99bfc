use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable is optional; the service degrades to fallback results and
/// in-memory storage when the API key or Redis URL is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub redis_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub generation_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            redis_url: optional_env("REDIS_URL"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            generation_timeout: Duration::from_secs(
                std::env::var("GENERATION_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "60".to_string())
                    .parse::<u64>()
                    .context("GENERATION_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
        })
    }
}

/// Reads an environment variable, treating an empty value as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}
