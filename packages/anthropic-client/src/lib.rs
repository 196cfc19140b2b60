//! Pure Anthropic REST API client
//!
//! A small client for the Messages API with no domain-specific logic.
//! Transient failures (rate limits, overload, 5xx, connection errors) are
//! retried with exponential backoff before an error is surfaced.
//!
//! # Example
//!
//! ```rust,ignore
//! use anthropic_client::{AnthropicClient, Message, MessagesRequest};
//!
//! let client = AnthropicClient::from_env()?;
//!
//! let reply = client
//!     .complete("claude-haiku-4-5-20251001", "You are terse.", "Hello!", 256)
//!     .await?;
//! ```

pub mod error;
pub mod types;

pub use error::{AnthropicError, Result};
pub use types::*;

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_RETRIES: u32 = 6;
const BASE_BACKOFF: Duration = Duration::from_millis(500);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Pure Anthropic API client.
#[derive(Clone)]
pub struct AnthropicClient {
    http_client: Client,
    api_key: Arc<SecretString>,
    base_url: String,
    max_retries: u32,
}

impl AnthropicClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: Arc::new(SecretString::from(api_key.into())),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Create from environment variable `ANTHROPIC_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| AnthropicError::Config("ANTHROPIC_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    /// Set a custom base URL (proxies, local test servers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set how many times a transient failure is retried.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the retry limit.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Send a Messages request, retrying transient failures.
    pub async fn messages(&self, request: &MessagesRequest) -> Result<MessagesResponse> {
        let start = Instant::now();
        let mut attempt = 0;

        loop {
            match self.send_once(request).await {
                Ok(response) => {
                    debug!(
                        model = %request.model,
                        attempts = attempt + 1,
                        duration_ms = start.elapsed().as_millis(),
                        output_tokens = response.usage.map(|u| u.output_tokens),
                        "Anthropic messages call"
                    );
                    return Ok(response);
                }
                Err((err, retry_after)) if err.is_retryable() && attempt < self.max_retries => {
                    let delay = retry_after.unwrap_or_else(|| backoff_delay(attempt));
                    warn!(
                        model = %request.model,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis(),
                        error = %err,
                        "Transient Anthropic failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err((err, _)) => {
                    warn!(model = %request.model, error = %err, "Anthropic request failed");
                    return Err(err);
                }
            }
        }
    }

    /// Single-turn completion returning the reply text.
    pub async fn complete(
        &self,
        model: &str,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
        max_tokens: u32,
    ) -> Result<String> {
        let request = MessagesRequest::new(model, max_tokens)
            .system(system_prompt)
            .message(Message::user(user_prompt));

        self.complete_request(&request).await
    }

    /// Send a prepared request and return the first text block.
    pub async fn complete_request(&self, request: &MessagesRequest) -> Result<String> {
        let response = self.messages(request).await?;
        response
            .first_text()
            .map(str::to_string)
            .ok_or(AnthropicError::EmptyResponse)
    }

    async fn send_once(
        &self,
        request: &MessagesRequest,
    ) -> std::result::Result<MessagesResponse, (AnthropicError, Option<Duration>)> {
        let response = self
            .http_client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", API_VERSION)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| (AnthropicError::Network(e.to_string()), None))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(|secs| Duration::from_secs(secs).min(MAX_BACKOFF));

            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<types::ErrorEnvelope>(&error_text)
                .map(|env| format!("{}: {}", env.error.error_type, env.error.message))
                .unwrap_or(error_text);

            return Err((
                AnthropicError::Api {
                    status: status.as_u16(),
                    message,
                },
                retry_after,
            ));
        }

        response
            .json()
            .await
            .map_err(|e| (AnthropicError::Parse(e.to_string()), None))
    }
}

impl std::fmt::Debug for AnthropicClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicClient")
            .field("base_url", &self.base_url)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

/// Exponential backoff for the given zero-based retry attempt, capped.
pub fn backoff_delay(attempt: u32) -> Duration {
    let factor = 2u32.saturating_pow(attempt.min(16));
    BASE_BACKOFF.saturating_mul(factor).min(MAX_BACKOFF)
}
