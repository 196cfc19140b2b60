//! Agency service fee sections.
//!
//! Unlike the booking extractors, almost every field here is fixed. The
//! model is only asked for passenger count and travel dates; the amount
//! comes from the submission form.

use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::traits::backend::{ModelTier, StructuredBackend, StructuredCall};
use crate::types::section::Section;

const CONTEXT_PROMPT: &str = "\
You are the service-fee context reader for a travel agency.
From the invoice, report the number of passengers and the overall travel dates.
Return ONLY a JSON object: {\"noofpax\": <number>, \"startDate\": \"MM/DD/YY\", \"endDate\": \"MM/DD/YY\"}.
Leave out a date you cannot find. No prose, no markdown fences.";

pub const SCREEN_1_TITLE: &str = "Service Fee Screen 1";
pub const SCREEN_2_TITLE: &str = "Service Fee Screen 2";

/// Builds the two fixed-layout service fee sections.
#[derive(Clone)]
pub struct ServiceFeeExtractor {
    backend: Arc<dyn StructuredBackend>,
}

impl ServiceFeeExtractor {
    pub fn new(backend: Arc<dyn StructuredBackend>) -> Self {
        Self { backend }
    }

    /// `amount` must be positive; callers skip the fee task otherwise.
    pub async fn extract(
        &self,
        document: &str,
        amount: f64,
        today: NaiveDate,
    ) -> Result<Vec<Section>> {
        let start = Instant::now();
        let call = StructuredCall::new(CONTEXT_PROMPT, format!("INVOICE MARKDOWN:\n{}", document))
            .with_max_tokens(64)
            .with_tier(ModelTier::Accurate);

        let context = self.backend.complete_json(call).await?;
        let today = today.format("%m/%d/%y").to_string();

        let noofpax = match context.get("noofpax") {
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            _ => "1".to_string(),
        };
        let date = |key: &str| {
            context
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| today.clone())
        };
        let start_date = date("startDate");
        let end_date = date("endDate");

        debug!(
            noofpax = %noofpax,
            duration_ms = start.elapsed().as_millis(),
            "Service fee context read"
        );

        Ok(vec![
            Section::key_value(
                SCREEN_1_TITLE,
                [
                    ("reservationDate", today.clone()),
                    ("vendorName", "Service Fee".to_string()),
                    ("duration", "1".to_string()),
                    ("noofpax", noofpax),
                    ("noofunits", "1".to_string()),
                    ("tripType", "Domestic".to_string()),
                    ("chargedAs", "Total".to_string()),
                    ("totalBase", format!("{:.2}", amount)),
                    ("commissionPercentage", "100".to_string()),
                    ("clientGstRate", "5".to_string()),
                ],
            ),
            Section::key_value(
                SCREEN_2_TITLE,
                [
                    ("serviceProviderName", "Service Fee".to_string()),
                    ("startDate", start_date),
                    ("endDate", end_date),
                    ("description", "Agency Planning Fee".to_string()),
                ],
            ),
        ])
    }
}
