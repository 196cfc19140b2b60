//! Extraction workers.
//!
//! One [`Extractor`] per [`BookingType`], held in a read-only
//! [`ExtractorRegistry`]. Every booking extractor runs the same way: pick
//! vendor rule text for the routing decision's rule set, build the system
//! prompt, send the document with the shared context, and parse a section
//! list. Only the prompt text differs between types.

mod cruise;
mod day_tour;
mod flight;
mod hotel;
mod insurance;
mod new_traveller;
mod rail;
pub mod rules;
pub mod service_fee;
mod tour;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::debug;

use crate::currency::EnrichmentNote;
use crate::error::Result;
use crate::traits::backend::{ModelTier, StructuredBackend, StructuredCall};
use crate::types::routing::{BookingType, RoutingDecision};
use crate::types::section::Section;

pub use service_fee::ServiceFeeExtractor;

/// Immutable inputs shared by every task in a run.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionInput<'a> {
    pub document: &'a str,
    pub routing: &'a RoutingDecision,
    pub enrichment: Option<&'a EnrichmentNote>,
    pub today: NaiveDate,
    /// Currency the booking system stores amounts in
    pub home_currency: &'a str,
}

/// A worker that turns a document into sections for one booking type.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Identifier used in logs.
    fn name(&self) -> &str;

    async fn extract(&self, input: &ExtractionInput<'_>) -> Result<Vec<Section>>;
}

/// Prompt material for one booking type.
pub(crate) struct PromptProfile {
    pub system: String,
    pub closing: &'static str,
    pub max_tokens: u32,
}

fn profile_for(booking_type: BookingType, rule_set: &str, home_currency: &str) -> PromptProfile {
    let mut profile = match booking_type {
        BookingType::Flight => flight::profile(rule_set),
        BookingType::Tour => tour::profile(rule_set),
        BookingType::DayTour => day_tour::profile(rule_set),
        BookingType::Hotel => hotel::profile(rule_set),
        BookingType::Cruise => cruise::profile(rule_set),
        BookingType::Insurance => insurance::profile(rule_set),
        BookingType::Rail => rail::profile(rule_set),
        BookingType::NewTraveller => new_traveller::profile(rule_set),
    };
    profile.system = rules::with_home_currency(&profile.system, home_currency);
    profile
}

/// User content shared by every booking extractor.
pub(crate) fn user_content(input: &ExtractionInput<'_>, closing: &str) -> String {
    let mut content = format!(
        "VENDOR: {}\nRULE SET: {}\nTODAY'S DATE: {}\n\nINVOICE MARKDOWN:\n{}\n",
        input.routing.vendor,
        input.routing.rule_set,
        input.today.format("%m/%d/%y"),
        input.document,
    );

    if let Some(note) = input.enrichment {
        content.push('\n');
        content.push_str(note.as_str());
        content.push('\n');
    }

    content.push('\n');
    content.push_str(closing);
    content
}

/// Model-backed extractor for one booking type.
pub struct BookingExtractor {
    booking_type: BookingType,
    backend: Arc<dyn StructuredBackend>,
}

impl BookingExtractor {
    pub fn new(booking_type: BookingType, backend: Arc<dyn StructuredBackend>) -> Self {
        Self {
            booking_type,
            backend,
        }
    }

    pub fn booking_type(&self) -> BookingType {
        self.booking_type
    }
}

#[async_trait]
impl Extractor for BookingExtractor {
    fn name(&self) -> &str {
        self.booking_type.as_str()
    }

    async fn extract(&self, input: &ExtractionInput<'_>) -> Result<Vec<Section>> {
        let start = Instant::now();
        let profile = profile_for(
            self.booking_type,
            &input.routing.rule_set,
            input.home_currency,
        );

        let call = StructuredCall::new(profile.system, user_content(input, profile.closing))
            .with_max_tokens(profile.max_tokens)
            .with_tier(ModelTier::Accurate);

        let sections = self.backend.complete_sections(call).await?;

        debug!(
            booking_type = %self.booking_type,
            sections = sections.len(),
            duration_ms = start.elapsed().as_millis(),
            "Extractor finished"
        );

        Ok(sections)
    }
}

/// Booking type to extractor map. Read-only once built.
#[derive(Clone, Default)]
pub struct ExtractorRegistry {
    extractors: HashMap<BookingType, Arc<dyn Extractor>>,
}

impl ExtractorRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with a model-backed extractor for every booking type.
    pub fn standard(backend: Arc<dyn StructuredBackend>) -> Self {
        BookingType::ALL
            .into_iter()
            .fold(Self::new(), |registry, booking_type| {
                registry.with_extractor(
                    booking_type,
                    Arc::new(BookingExtractor::new(booking_type, backend.clone())),
                )
            })
    }

    /// Register (or replace) the extractor for a type.
    pub fn with_extractor(mut self, booking_type: BookingType, extractor: Arc<dyn Extractor>) -> Self {
        self.extractors.insert(booking_type, extractor);
        self
    }

    /// Look up by raw identifier. `None` for unknown or unregistered types.
    pub fn get(&self, identifier: &str) -> Option<Arc<dyn Extractor>> {
        let booking_type = identifier.parse::<BookingType>().ok()?;
        self.extractors.get(&booking_type).cloned()
    }

    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockBackend;
    use serde_json::json;

    fn routing(rule_set: &str) -> RoutingDecision {
        RoutingDecision::new("Air Canada Internet", rule_set).with_booking_type("flight")
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, 26).unwrap()
    }

    #[test]
    fn test_user_content_layout() {
        let routing = routing("air_canada");
        let note = EnrichmentNote::new("LIVE EXCHANGE RATE: 1 USD = 1.3500 CAD (fetched 08/26/24)");
        let input = ExtractionInput {
            document: "PNR: ABC123",
            routing: &routing,
            enrichment: Some(&note),
            today: today(),
            home_currency: "CAD",
        };

        let content = user_content(&input, "Return the sections.");

        assert!(content.starts_with(
            "VENDOR: Air Canada Internet\nRULE SET: air_canada\nTODAY'S DATE: 08/26/24\n\nINVOICE MARKDOWN:\nPNR: ABC123\n"
        ));
        assert!(content.contains("\nLIVE EXCHANGE RATE: 1 USD = 1.3500 CAD"));
        assert!(content.ends_with("\nReturn the sections."));
    }

    #[test]
    fn test_user_content_without_note() {
        let routing = routing("generic");
        let input = ExtractionInput {
            document: "doc",
            routing: &routing,
            enrichment: None,
            today: today(),
            home_currency: "CAD",
        };

        assert!(!user_content(&input, "x").contains("EXCHANGE RATE"));
    }

    #[test]
    fn test_every_type_has_a_profile() {
        for booking_type in BookingType::ALL {
            let profile = profile_for(booking_type, "generic", "CAD");
            assert!(profile
                .system
                .contains(&rules::with_home_currency(rules::GLOBAL_RULES, "CAD")));
            assert!(!profile.system.contains(rules::HOME_CURRENCY_SLOT));
            assert!(profile.max_tokens >= 2000);
            assert!(!profile.closing.is_empty());
        }
    }

    #[test]
    fn test_standard_registry_covers_all_types() {
        let registry = ExtractorRegistry::standard(Arc::new(MockBackend::new()));

        assert_eq!(registry.len(), BookingType::ALL.len());
        assert_eq!(registry.get("day_tour").unwrap().name(), "day_tour");
        assert!(registry.get("submarine_charter").is_none());
    }

    #[tokio::test]
    async fn test_booking_extractor_sends_profile() {
        let backend = Arc::new(MockBackend::new().with_response(
            "hotel extractor",
            json!([
                {"sectionTitle": "Hotel Screen 1 (Summary)", "data": {"vendor": "Expedia TAAP"}},
                {"sectionTitle": "Hotel Screen 2 (Details)", "data": {"checkInTime": "3:00 PM"}}
            ]),
        ));
        let extractor = BookingExtractor::new(BookingType::Hotel, backend.clone());
        let routing = RoutingDecision::new("Expedia TAAP", "expedia").with_booking_type("hotel");
        let input = ExtractionInput {
            document: "Room price CA $1,402.02",
            routing: &routing,
            enrichment: None,
            today: today(),
            home_currency: "CAD",
        };

        let sections = extractor.extract(&input).await.unwrap();

        assert_eq!(sections.len(), 2);
        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].max_tokens, 3000);
        assert_eq!(calls[0].tier, ModelTier::Accurate);
        assert!(calls[0].system.contains("EXPEDIA TAAP"));
        assert!(calls[0].system.contains("in CAD (convert if needed)"));
        assert!(calls[0].user.contains("Room price CA $1,402.02"));
    }

    #[tokio::test]
    async fn test_prompts_use_configured_home_currency() {
        let backend = Arc::new(MockBackend::new().with_response(
            "tour extractor",
            json!([{"sectionTitle": "Tour Screen 1", "data": {"vendor": "Tourcan Vacations"}}]),
        ));
        let extractor = BookingExtractor::new(BookingType::Tour, backend.clone());
        let routing = RoutingDecision::new("Tourcan Vacations", "tourcan").with_booking_type("tour");
        let input = ExtractionInput {
            document: "Total: EUR 2,310.00",
            routing: &routing,
            enrichment: None,
            today: today(),
            home_currency: "USD",
        };

        extractor.extract(&input).await.unwrap();

        let system = &backend.calls()[0].system;
        assert!(system.contains("If the invoice is NOT in USD"));
        assert!(system.contains("Amount in USD, 2 decimals"));
        assert!(!system.contains("CAD"));
        assert!(!system.contains(rules::HOME_CURRENCY_SLOT));
    }
}
