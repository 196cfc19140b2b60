//! Minimal client for the Resend transactional email API.

use std::time::Duration;

pub mod models;

use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::SendEmailBody;
pub use crate::models::{Attachment, EmailMessage, SendEmailResponse};

const DEFAULT_BASE_URL: &str = "https://api.resend.com";
const SEND_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum ResendError {
    #[error("Resend request failed: {0}")]
    Network(String),

    #[error("Resend returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to parse Resend response: {0}")]
    Parse(String),
}

#[derive(Debug, Clone)]
pub struct ResendOptions {
    pub api_key: String,
    pub from: String,
    pub to: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ResendService {
    options: ResendOptions,
    base_url: String,
    client: Client,
}

impl ResendService {
    pub fn new(options: ResendOptions) -> Self {
        let client = Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            options,
            base_url: DEFAULT_BASE_URL.to_string(),
            client,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn options(&self) -> &ResendOptions {
        &self.options
    }

    pub async fn send_email(&self, message: &EmailMessage) -> Result<SendEmailResponse, ResendError> {
        let body = SendEmailBody {
            from: &self.options.from,
            to: &self.options.to,
            subject: &message.subject,
            html: &message.html,
            attachments: &message.attachments,
        };

        let response = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.options.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Request to Resend failed");
                ResendError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %body, "Resend returned an error");
            return Err(ResendError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let sent = response
            .json::<SendEmailResponse>()
            .await
            .map_err(|e| ResendError::Parse(e.to_string()))?;

        debug!(email_id = %sent.id, attachments = message.attachments.len(), "Email sent");
        Ok(sent)
    }
}
