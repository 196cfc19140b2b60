//! Routing decision and the closed set of booking types.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Classifier output. Produced once per run and never mutated.
///
/// `booking_types` stays as raw strings: unknown identifiers must survive
/// to dispatch so they can be reported by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoutingDecision {
    /// Normalized vendor name
    pub vendor: String,

    /// Key selecting vendor-specific rule text inside each extractor
    #[serde(default = "default_rule_set")]
    pub rule_set: String,

    /// Detected booking types, in output order (duplicates allowed)
    #[serde(default)]
    pub booking_types: Vec<String>,

    /// Whether the submission carried an agency service fee
    #[serde(default)]
    pub service_fee_included: bool,
}

fn default_rule_set() -> String {
    "generic".to_string()
}

impl RoutingDecision {
    pub fn new(vendor: impl Into<String>, rule_set: impl Into<String>) -> Self {
        Self {
            vendor: vendor.into(),
            rule_set: rule_set.into(),
            booking_types: Vec::new(),
            service_fee_included: false,
        }
    }

    pub fn with_booking_type(mut self, booking_type: impl Into<String>) -> Self {
        self.booking_types.push(booking_type.into());
        self
    }

    pub fn with_service_fee_included(mut self, included: bool) -> Self {
        self.service_fee_included = included;
        self
    }
}

/// Booking types with a registered extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingType {
    Flight,
    Tour,
    DayTour,
    Hotel,
    Cruise,
    Insurance,
    Rail,
    NewTraveller,
}

impl BookingType {
    pub const ALL: [BookingType; 8] = [
        BookingType::Flight,
        BookingType::Tour,
        BookingType::DayTour,
        BookingType::Hotel,
        BookingType::Cruise,
        BookingType::Insurance,
        BookingType::Rail,
        BookingType::NewTraveller,
    ];

    /// Identifier used by the classifier and the upload form.
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingType::Flight => "flight",
            BookingType::Tour => "tour",
            BookingType::DayTour => "day_tour",
            BookingType::Hotel => "hotel",
            BookingType::Cruise => "cruise",
            BookingType::Insurance => "insurance",
            BookingType::Rail => "rail",
            BookingType::NewTraveller => "new_traveller",
        }
    }

    /// Human label for forms and email subjects.
    pub fn display_name(&self) -> &'static str {
        match self {
            BookingType::Flight => "Flight",
            BookingType::Tour => "Tour",
            BookingType::DayTour => "Day Tour",
            BookingType::Hotel => "Hotel",
            BookingType::Cruise => "Cruise",
            BookingType::Insurance => "Insurance",
            BookingType::Rail => "Rail",
            BookingType::NewTraveller => "New Traveller",
        }
    }
}

impl fmt::Display for BookingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier that names no registered booking type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBookingType(pub String);

impl fmt::Display for UnknownBookingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown booking type '{}'", self.0)
    }
}

impl std::error::Error for UnknownBookingType {}

impl FromStr for BookingType {
    type Err = UnknownBookingType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookingType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownBookingType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_and_unknown() {
        assert_eq!("day_tour".parse::<BookingType>(), Ok(BookingType::DayTour));
        assert_eq!(
            "submarine_charter".parse::<BookingType>(),
            Err(UnknownBookingType("submarine_charter".into()))
        );
        // Identifiers are exact; the classifier is told to emit lowercase keys
        assert!("Flight".parse::<BookingType>().is_err());
    }

    #[test]
    fn test_every_type_round_trips_its_identifier() {
        for t in BookingType::ALL {
            assert_eq!(t.as_str().parse::<BookingType>(), Ok(t));
        }
    }

    #[test]
    fn test_routing_defaults() {
        let routing: RoutingDecision =
            serde_json::from_str(r#"{"vendor": "Expedia TAAP", "bookingTypes": ["hotel"]}"#)
                .unwrap();

        assert_eq!(routing.rule_set, "generic");
        assert!(!routing.service_fee_included);
        assert_eq!(routing.booking_types, vec!["hotel"]);
    }

    #[test]
    fn test_routing_serializes_camel_case() {
        let routing = RoutingDecision::new("Viator on Line", "viator").with_booking_type("day_tour");
        let json = serde_json::to_value(&routing).unwrap();

        assert_eq!(json["ruleSet"], "viator");
        assert_eq!(json["bookingTypes"][0], "day_tour");
        assert_eq!(json["serviceFeeIncluded"], false);
    }
}
