use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_LLM_TIMEOUT_SECS: u64 = 120;

/// Application configuration loaded from environment variables.
/// Fails at startup if the model credential is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Upper bound for one candidate's model call, retries included.
    pub llm_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            llm_timeout: parse_timeout(std::env::var("LLM_TIMEOUT_SECS").ok())?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    let value = std::env::var(key)
        .with_context(|| format!("Required environment variable '{key}' is not set"))?;
    if value.trim().is_empty() {
        anyhow::bail!("Required environment variable '{key}' is empty");
    }
    Ok(value)
}

fn parse_timeout(raw: Option<String>) -> Result<Duration> {
    let secs = match raw {
        Some(v) => v
            .trim()
            .parse::<u64>()
            .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
        None => DEFAULT_LLM_TIMEOUT_SECS,
    };
    if secs == 0 {
        anyhow::bail!("LLM_TIMEOUT_SECS must be greater than zero");
    }
    Ok(Duration::from_secs(secs))
}
