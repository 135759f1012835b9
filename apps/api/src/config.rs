use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every setting has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Maximum accepted request body, in bytes.
    pub body_limit_bytes: usize,
    /// Most users whose onboarding drafts are held at once.
    pub draft_max_users: u64,
    /// Drafts untouched for this many seconds are dropped.
    pub draft_idle_secs: u64,
}

const DEFAULT_BODY_LIMIT_BYTES: usize = 1024 * 1024;
const DEFAULT_DRAFT_MAX_USERS: u64 = 10_000;
const DEFAULT_DRAFT_IDLE_SECS: u64 = 60 * 60;

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            body_limit_bytes: optional_env("BODY_LIMIT_BYTES")
                .map(|raw| {
                    raw.parse::<usize>()
                        .context("BODY_LIMIT_BYTES must be a byte count")
                })
                .transpose()?
                .unwrap_or(DEFAULT_BODY_LIMIT_BYTES),
            draft_max_users: optional_env("DRAFT_MAX_USERS")
                .map(|raw| {
                    raw.parse::<u64>()
                        .context("DRAFT_MAX_USERS must be a whole number")
                })
                .transpose()?
                .unwrap_or(DEFAULT_DRAFT_MAX_USERS),
            draft_idle_secs: optional_env("DRAFT_IDLE_SECS")
                .map(|raw| {
                    raw.parse::<u64>()
                        .context("DRAFT_IDLE_SECS must be a number of seconds")
                })
                .transpose()?
                .unwrap_or(DEFAULT_DRAFT_IDLE_SECS),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
