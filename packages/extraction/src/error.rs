//! Typed errors for the extraction library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use std::any::Any;
use std::time::Duration;

use thiserror::Error;

/// Errors raised by extraction collaborators and workers.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Model backend unavailable or failed
    #[error("model backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The model reply was not valid JSON
    #[error("malformed JSON from model: {0}")]
    MalformedJson(#[from] serde_json::Error),

    /// A section list was requested but the payload was some other JSON value
    #[error("expected a JSON array of sections, got {found}")]
    NotAList { found: &'static str },

    /// An array element did not have the `{sectionTitle, data}` shape
    #[error("invalid section at index {index}: {reason}")]
    InvalidSection { index: usize, reason: String },

    /// Document bundle could not be turned into text
    #[error("normalization failed: {0}")]
    Normalization(String),

    /// Routing decision could not be produced
    #[error("classification failed: {0}")]
    Classification(String),

    /// The task panicked; the payload message is kept
    #[error("extractor panicked: {0}")]
    Panicked(String),
}

/// Errors from an exchange rate source.
#[derive(Debug, Error)]
pub enum RateError {
    /// HTTP request failed
    #[error("rate request failed: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Non-2xx response
    #[error("rate source returned status {0}")]
    Status(u16),

    /// Response did not contain the requested currency
    #[error("no {currency} rate in response")]
    MissingRate { currency: String },
}

/// Errors from result delivery.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Email transport failed
    #[error("email delivery failed: {0}")]
    Email(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Callback POST failed
    #[error("callback delivery failed: {0}")]
    Callback(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Several deliveries failed; messages are joined
    #[error("{0}")]
    Multiple(String),
}

/// Run-fatal failures. Any of these short-circuits straight to delivery.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("run aborted during normalization: {0}")]
    Normalize(#[source] ExtractionError),

    #[error("run aborted during classification: {0}")]
    Classify(#[source] ExtractionError),

    #[error("run exceeded timeout of {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("run panicked: {0}")]
    Panicked(String),
}

/// Message carried by a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Result type alias for rate lookups.
pub type RateResult<T> = std::result::Result<T, RateError>;

/// Result type alias for delivery.
pub type DeliveryResult<T> = std::result::Result<T, DeliveryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message() {
        let err = PipelineError::Timeout(Duration::from_secs(300));
        assert_eq!(err.to_string(), "run exceeded timeout of 300s");
    }

    #[test]
    fn test_classify_wraps_source() {
        let err = PipelineError::Classify(ExtractionError::Classification("no vendor".into()));
        assert_eq!(
            err.to_string(),
            "run aborted during classification: classification failed: no vendor"
        );
    }

    #[test]
    fn test_panic_message_from_payload() {
        let payload = std::panic::catch_unwind(|| panic!("index {} out of range", 3)).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "index 3 out of range");

        let payload = std::panic::catch_unwind(|| panic!("static message")).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "static message");
    }
}
