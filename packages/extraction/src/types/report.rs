//! Run inputs and the report handed to delivery.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::document::DocumentFile;
use super::section::Section;

/// Everything a caller submits for one run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub run_id: Uuid,
    pub vendor_hint: String,
    pub booking_type_hint: String,
    pub service_fee: f64,
    pub callback_url: Option<String>,
    pub files: Vec<DocumentFile>,
    /// Date used for "today" in prompts and fee sections
    pub today: NaiveDate,
}

impl RunRequest {
    pub fn new(vendor_hint: impl Into<String>, files: Vec<DocumentFile>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            vendor_hint: vendor_hint.into(),
            booking_type_hint: String::new(),
            service_fee: 0.0,
            callback_url: None,
            files,
            today: Local::now().date_naive(),
        }
    }

    pub fn with_booking_type_hint(mut self, hint: impl Into<String>) -> Self {
        self.booking_type_hint = hint.into();
        self
    }

    pub fn with_service_fee(mut self, amount: f64) -> Self {
        self.service_fee = amount;
        self
    }

    /// Empty strings are treated as "no callback".
    pub fn with_callback_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.callback_url = (!url.trim().is_empty()).then_some(url);
        self
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Error,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Success => "success",
            RunStatus::Error => "error",
        }
    }
}

/// Outcome of a run, delivered exactly once whatever happened.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: Uuid,
    pub status: RunStatus,
    pub error: Option<String>,
    pub vendor: String,
    pub booking_types: Vec<String>,
    pub sections: Vec<Section>,
    pub traveller_name: String,
    pub attachments: Vec<DocumentFile>,
    pub callback_url: Option<String>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_callback_is_none() {
        let request = RunRequest::new("Westjet", vec![]).with_callback_url("   ");
        assert!(request.callback_url.is_none());

        let request = request.with_callback_url("https://hooks.example.com/run");
        assert_eq!(
            request.callback_url.as_deref(),
            Some("https://hooks.example.com/run")
        );
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_value(RunStatus::Error).unwrap(), "error");
        assert_eq!(RunStatus::Success.as_str(), "success");
    }
}
