use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use extraction::ai::{DEFAULT_ACCURATE_MODEL, DEFAULT_FAST_MODEL};
use secrecy::SecretString;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub anthropic_api_key: SecretString,
    pub extraction_model: String,
    pub fast_model: String,
    pub resend_api_key: SecretString,
    pub from_email: String,
    pub to_email: String,
    pub home_currency: String,
    pub rate_source_url: String,
    pub stage_cooldown: Duration,
    pub run_timeout: Duration,
    pub callback_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            anthropic_api_key: env::var("ANTHROPIC_API_KEY")
                .context("ANTHROPIC_API_KEY must be set")?
                .into(),
            extraction_model: env::var("EXTRACTION_MODEL")
                .unwrap_or_else(|_| DEFAULT_ACCURATE_MODEL.to_string()),
            fast_model: env::var("FAST_MODEL").unwrap_or_else(|_| DEFAULT_FAST_MODEL.to_string()),
            resend_api_key: env::var("RESEND_API_KEY")
                .context("RESEND_API_KEY must be set")?
                .into(),
            from_email: env::var("FROM_EMAIL").context("FROM_EMAIL must be set")?,
            to_email: env::var("TO_EMAIL").context("TO_EMAIL must be set")?,
            home_currency: env::var("HOME_CURRENCY")
                .unwrap_or_else(|_| "CAD".to_string())
                .to_ascii_uppercase(),
            rate_source_url: env::var("RATE_SOURCE_URL")
                .unwrap_or_else(|_| "https://api.frankfurter.app".to_string()),
            stage_cooldown: secs_var("STAGE_COOLDOWN_SECS", 5)?,
            run_timeout: secs_var("RUN_TIMEOUT_SECS", 300)?,
            callback_timeout: secs_var("CALLBACK_TIMEOUT_SECS", 30)?,
        })
    }

    /// Recipients from `TO_EMAIL`, comma separated.
    pub fn recipients(&self) -> Vec<String> {
        self.to_email
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

fn secs_var(name: &str, default: u64) -> Result<Duration> {
    let secs = match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("{} must be a whole number of seconds", name))?,
        Err(_) => default,
    };
    Ok(Duration::from_secs(secs))
}
