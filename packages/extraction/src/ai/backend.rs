use async_trait::async_trait;
use anthropic_client::{AnthropicClient, Message, MessagesRequest};
use serde_json::Value;

use crate::error::{ExtractionError, Result};
use crate::traits::backend::{parse_json_payload, ModelTier, StructuredBackend, StructuredCall};

pub const DEFAULT_FAST_MODEL: &str = "claude-haiku-4-5-20251001";
pub const DEFAULT_ACCURATE_MODEL: &str = "claude-sonnet-4-6";

/// Structured backend over the Messages API.
///
/// Fast-tier calls (normalizing, routing) and accurate-tier calls
/// (extraction) go to separately configurable models.
///
/// # Example
///
/// ```rust,ignore
/// use extraction::ai::AnthropicBackend;
///
/// let backend = AnthropicBackend::new(AnthropicClient::from_env()?)
///     .with_accurate_model("claude-sonnet-4-6");
/// ```
#[derive(Debug, Clone)]
pub struct AnthropicBackend {
    client: AnthropicClient,
    fast_model: String,
    accurate_model: String,
}

impl AnthropicBackend {
    pub fn new(client: AnthropicClient) -> Self {
        Self {
            client,
            fast_model: DEFAULT_FAST_MODEL.to_string(),
            accurate_model: DEFAULT_ACCURATE_MODEL.to_string(),
        }
    }

    /// Set the model used for [`ModelTier::Fast`] calls.
    pub fn with_fast_model(mut self, model: impl Into<String>) -> Self {
        self.fast_model = model.into();
        self
    }

    /// Set the model used for [`ModelTier::Accurate`] calls.
    pub fn with_accurate_model(mut self, model: impl Into<String>) -> Self {
        self.accurate_model = model.into();
        self
    }

    pub fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Fast => &self.fast_model,
            ModelTier::Accurate => &self.accurate_model,
        }
    }

    pub fn client(&self) -> &AnthropicClient {
        &self.client
    }
}

#[async_trait]
impl StructuredBackend for AnthropicBackend {
    async fn complete_json(&self, call: StructuredCall) -> Result<Value> {
        let request = MessagesRequest::new(self.model_for(call.tier), call.max_tokens)
            .system(call.system)
            .message(Message::user(call.user));

        let text = self
            .client
            .complete_request(&request)
            .await
            .map_err(|e| ExtractionError::Backend(Box::new(e)))?;

        parse_json_payload(&text)
    }
}
