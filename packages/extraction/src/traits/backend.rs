//! Structured-call backend: system instructions + user content in, JSON out.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{ExtractionError, Result};
use crate::types::section::Section;

/// Which model pool a call should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelTier {
    /// Cheap model for normalizing and routing
    Fast,
    /// Stronger model for schema extraction
    Accurate,
}

/// One structured call.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredCall {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
    pub tier: ModelTier,
}

impl StructuredCall {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            max_tokens: 4096,
            tier: ModelTier::Accurate,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_tier(mut self, tier: ModelTier) -> Self {
        self.tier = tier;
        self
    }
}

/// The single model-calling contract the pipeline depends on.
///
/// Retries live below this trait, in the concrete client.
#[async_trait]
pub trait StructuredBackend: Send + Sync {
    /// Run the call and parse the reply as JSON.
    ///
    /// Must return [`ExtractionError::MalformedJson`] when the reply is not JSON.
    async fn complete_json(&self, call: StructuredCall) -> Result<Value>;

    /// Run the call and interpret the reply as a section list.
    ///
    /// Fails with [`ExtractionError::NotAList`] when the payload is not an array.
    async fn complete_sections(&self, call: StructuredCall) -> Result<Vec<Section>> {
        let value = self.complete_json(call).await?;
        sections_from_value(value)
    }
}

/// Strip an optional markdown fence and parse the remainder as JSON.
pub fn parse_json_payload(raw: &str) -> Result<Value> {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        let rest = rest
            .strip_prefix("json")
            .or_else(|| rest.strip_prefix("JSON"))
            .unwrap_or(rest);
        text = rest.trim_start();
        text = text.strip_suffix("```").unwrap_or(text).trim_end();
    }

    Ok(serde_json::from_str(text)?)
}

/// Convert a JSON payload into sections.
pub fn sections_from_value(value: Value) -> Result<Vec<Section>> {
    let Value::Array(items) = value else {
        return Err(ExtractionError::NotAList {
            found: json_kind(&value),
        });
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|e| ExtractionError::InvalidSection {
                index,
                reason: e.to_string(),
            })
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_strips_fences() {
        assert_eq!(parse_json_payload("```json\n[]\n```").unwrap(), json!([]));
        assert_eq!(parse_json_payload("```\n{\"a\": 1}\n```").unwrap(), json!({"a": 1}));
        assert_eq!(parse_json_payload("  [1]  ").unwrap(), json!([1]));
    }

    #[test]
    fn test_parse_reports_malformed_json() {
        let err = parse_json_payload("Here are your sections: [").unwrap_err();
        assert!(matches!(err, ExtractionError::MalformedJson(_)));
    }

    #[test]
    fn test_object_is_not_a_list() {
        let err = sections_from_value(json!({"sectionTitle": "x", "data": {}})).unwrap_err();
        assert!(matches!(err, ExtractionError::NotAList { found: "an object" }));
    }

    #[test]
    fn test_bad_element_reports_index() {
        let err = sections_from_value(json!([
            {"sectionTitle": "ok", "data": {}},
            {"title": "missing fields"}
        ]))
        .unwrap_err();

        assert!(matches!(err, ExtractionError::InvalidSection { index: 1, .. }));
    }
}
