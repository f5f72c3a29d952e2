use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_THRESHOLD: &str = "0.8";

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub threshold: String,
    /// `None` leaves backend calls unbounded.
    pub timeout: Option<Duration>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let timeout = match std::env::var("MATCH_TIMEOUT_SECS") {
            Ok(raw) => Some(parse_timeout(&raw)?),
            Err(_) => None,
        };

        Ok(Config {
            api_url: normalize_base_url(
                &std::env::var("MATCH_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            ),
            threshold: std::env::var("MATCH_THRESHOLD")
                .unwrap_or_else(|_| DEFAULT_THRESHOLD.to_string()),
            timeout,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn parse_timeout(raw: &str) -> Result<Duration> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .with_context(|| format!("MATCH_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'"))
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
