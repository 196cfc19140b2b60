//! Model-backed routing.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use schemars::schema_for;
use tracing::{debug, warn};

use crate::error::{ExtractionError, Result};
use crate::traits::backend::{ModelTier, StructuredBackend, StructuredCall};
use crate::traits::classifier::Classifier;
use crate::types::routing::RoutingDecision;

const ROUTING_PROMPT: &str = "\
You are the booking classifier for a travel agency that keys bookings into ClientBase Online.
Read the invoice text and decide the vendor, the rule set and every booking type present.
Return ONLY a JSON object. No prose, no markdown fences.

VENDORS (official name: what to look for)
- Air Canada Internet: Air Canada, AC, AirCan
- Westjet Internet: WestJet, West Jet, WJ
- Expedia TAAP: Expedia, TAAP
- Intair: Travel Brands, but only for flight bookings
- Travel Brands: Travel Brands for tour or land bookings
- ADX: ADX, or Intair / Travel Brands with an explicit COMMISSION line
- Manulife Insurance: any insurance policy
- Viator on Line: Viator (always day_tour, never tour)
- Tourcan Vacations: Tourcan
- VIA Rail: VIA, VIA Rail Canada
- Amtrak: Amtrak, National Railroad Passenger
- Eurostar: Eurostar
- Rail Europe Inc: Eurail, Rail Europe, The Trainline
The form's vendor hint is a starting point; the invoice content wins.

RULE SETS (use these keys exactly)
air_canada, westjet, adx_intair, expedia, travel_brands, viator, manulife, tourcan.
Everything else, every rail vendor included, is generic.

ADX OR INTAIR
- Intair or Travel Brands header with a COMMISSION line and amount: vendor ADX, rule set adx_intair
- Travel Brands tour without a COMMISSION line: vendor Travel Brands, rule set travel_brands
- Travel Brands flight without a COMMISSION line: vendor Intair, rule set travel_brands

BOOKING TYPES (lowercase identifiers)
- flight: tickets, PNR, flight segments
- tour: multi-day land package, tour code, accommodation with guided activities
- day_tour: Viator, single-day or shore excursions, possibly several on one booking
- hotel: accommodation only, check-in and check-out, no flights
- cruise: ship, cabin, embarkation and debarkation ports
- insurance: policy number, premium, coverage dates
- new_traveller: a customer profile with contact details and no booking
- rail: train segments, stations, coach or seat numbers, rail passes
One invoice can hold several types (air plus land is common). List all of them, in invoice order.";

/// Routes a document with one fast-tier structured call.
pub struct LlmClassifier {
    backend: Arc<dyn StructuredBackend>,
}

impl LlmClassifier {
    pub fn new(backend: Arc<dyn StructuredBackend>) -> Self {
        Self { backend }
    }

    fn system_prompt() -> String {
        // Object schema only, without the `$schema` header
        let schema =
            serde_json::to_string_pretty(&schema_for!(RoutingDecision).schema).unwrap_or_default();
        format!("{}\n\nOUTPUT SCHEMA:\n{}", ROUTING_PROMPT, schema)
    }

    fn user_content(document: &str, vendor_hint: &str, booking_type_hint: &str) -> String {
        format!(
            "VENDOR HINT from form: \"{}\"\nBOOKING TYPE HINT from form: \"{}\"\n\n\
             INVOICE MARKDOWN:\n{}\n\nReturn only the JSON classification object.",
            vendor_hint, booking_type_hint, document
        )
    }
}

#[async_trait]
impl Classifier for LlmClassifier {
    async fn classify(
        &self,
        document: &str,
        vendor_hint: &str,
        booking_type_hint: &str,
    ) -> Result<RoutingDecision> {
        let start = Instant::now();
        let call = StructuredCall::new(
            Self::system_prompt(),
            Self::user_content(document, vendor_hint, booking_type_hint),
        )
        .with_max_tokens(512)
        .with_tier(ModelTier::Fast);

        let value = self.backend.complete_json(call).await?;
        let mut routing: RoutingDecision = serde_json::from_value(value)
            .map_err(|e| ExtractionError::Classification(e.to_string()))?;

        for booking_type in routing.booking_types.iter_mut() {
            *booking_type = booking_type.trim().to_string();
        }

        if routing.vendor.trim().is_empty() {
            warn!(vendor_hint, "Classifier returned no vendor, using the hint");
            routing.vendor = vendor_hint.to_string();
        }

        debug!(
            vendor = %routing.vendor,
            duration_ms = start.elapsed().as_millis(),
            "Classified document"
        );

        Ok(routing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockBackend;
    use serde_json::json;

    #[tokio::test]
    async fn test_decision_from_model_json() {
        let backend = Arc::new(MockBackend::new().with_response(
            "booking classifier",
            json!({
                "vendor": "ADX",
                "ruleSet": "adx_intair",
                "bookingTypes": ["flight", " tour "],
                "serviceFeeIncluded": true
            }),
        ));
        let classifier = LlmClassifier::new(backend.clone());

        let routing = classifier
            .classify("COMMISSION: $120.00", "Intair", "")
            .await
            .unwrap();

        assert_eq!(routing.vendor, "ADX");
        assert_eq!(routing.rule_set, "adx_intair");
        assert_eq!(routing.booking_types, vec!["flight", "tour"]);
        assert!(routing.service_fee_included);

        let call = &backend.calls()[0];
        assert_eq!(call.tier, ModelTier::Fast);
        assert_eq!(call.max_tokens, 512);
        assert!(call.system.contains("\"bookingTypes\""));
        assert!(!call.system.contains("$schema"));
        assert!(call.user.starts_with("VENDOR HINT from form: \"Intair\""));
    }

    #[tokio::test]
    async fn test_missing_fields_default() {
        let backend = Arc::new(MockBackend::new().with_response(
            "booking classifier",
            json!({"vendor": "", "bookingTypes": ["hotel"]}),
        ));

        let routing = LlmClassifier::new(backend)
            .classify("doc", "Expedia", "hotel")
            .await
            .unwrap();

        assert_eq!(routing.vendor, "Expedia");
        assert_eq!(routing.rule_set, "generic");
        assert!(!routing.service_fee_included);
    }

    #[tokio::test]
    async fn test_wrong_shape_is_classification_error() {
        let backend = Arc::new(
            MockBackend::new().with_response("booking classifier", json!(["flight"])),
        );

        let err = LlmClassifier::new(backend)
            .classify("doc", "", "")
            .await
            .unwrap_err();

        assert!(matches!(err, ExtractionError::Classification(_)));
    }
}
