use std::time::{Duration, Instant};

use async_trait::async_trait;
use extraction::{Delivery, DeliveryError, DeliveryResult, RunReport, RunStatus, Section};
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum CallbackError {
    #[error("callback request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("callback returned {status}")]
    Status { status: u16 },
}

/// JSON body POSTed to the caller's callback URL.
#[derive(Debug, Serialize)]
pub struct CallbackPayload<'a> {
    pub status: RunStatus,
    pub traveller_name: &'a str,
    pub sections: &'a [Section],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
}

impl<'a> CallbackPayload<'a> {
    pub fn from_report(report: &'a RunReport) -> Self {
        Self {
            status: report.status,
            traveller_name: &report.traveller_name,
            sections: &report.sections,
            error: report.error.as_deref(),
        }
    }
}

/// POSTs the report to `report.callback_url`, when one was given.
#[derive(Debug, Clone)]
pub struct CallbackDelivery {
    client: Client,
    timeout: Duration,
}

impl CallbackDelivery {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            timeout,
        }
    }

    async fn post(&self, url: &str, report: &RunReport) -> Result<(), CallbackError> {
        let response = self
            .client
            .post(url)
            .timeout(self.timeout)
            .json(&CallbackPayload::from_report(report))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CallbackError::Status {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

impl Default for CallbackDelivery {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

#[async_trait]
impl Delivery for CallbackDelivery {
    async fn deliver(&self, report: &RunReport) -> DeliveryResult<()> {
        let Some(url) = report
            .callback_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
        else {
            debug!("No callback URL, skipping");
            return Ok(());
        };

        let start = Instant::now();
        self.post(url, report)
            .await
            .map_err(|e| DeliveryError::Callback(Box::new(e)))?;

        info!(
            callback_url = %url,
            duration_ms = start.elapsed().as_millis(),
            "Callback delivered"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn report(status: RunStatus, error: Option<&str>) -> RunReport {
        RunReport {
            run_id: Uuid::new_v4(),
            status,
            error: error.map(str::to_string),
            vendor: "Westjet Internet".to_string(),
            booking_types: vec!["flight".to_string()],
            sections: vec![Section::key_value(
                "Flight Screen 1 (Summary)",
                [("vendorName", "Westjet Internet")],
            )],
            traveller_name: "Jane Doe".to_string(),
            attachments: vec![],
            callback_url: None,
        }
    }

    #[test]
    fn test_payload_omits_error_on_success() {
        let report = report(RunStatus::Success, None);
        let payload = serde_json::to_value(CallbackPayload::from_report(&report)).unwrap();

        assert_eq!(
            payload,
            json!({
                "status": "success",
                "traveller_name": "Jane Doe",
                "sections": [
                    {"sectionTitle": "Flight Screen 1 (Summary)", "data": {"vendorName": "Westjet Internet"}}
                ]
            })
        );
    }

    #[test]
    fn test_payload_carries_error() {
        let report = report(RunStatus::Error, Some("run exceeded timeout of 300s"));
        let payload = serde_json::to_value(CallbackPayload::from_report(&report)).unwrap();

        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error"], "run exceeded timeout of 300s");
    }

    #[tokio::test]
    async fn test_no_url_is_a_no_op() {
        let delivery = CallbackDelivery::default();
        assert!(delivery.deliver(&report(RunStatus::Success, None)).await.is_ok());
    }
}
