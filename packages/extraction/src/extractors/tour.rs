use super::rules::{assemble, ARRAY_ONLY, CONVERSION_REMARKS, GLOBAL_RULES};
use super::PromptProfile;

const INTRO: &str = "\
You are the tour extractor for a travel agency that keys bookings into ClientBase Online.
Multi-day land packages only; single-day activities are handled elsewhere.
Read the invoice and return ONLY a JSON array of section objects.";

const TRAVEL_BRANDS: &str = "\
VENDOR RULES: TRAVEL BRANDS / INTAIR (tour)

confirmationNumber is the tour confirmation code.
finalPaymentDue is the \"Final Payment Due\" or \"Balance Due\" date.";

const GENERIC: &str = "\
VENDOR RULES: GENERIC TOUR OPERATOR

Copy commission exactly as shown on the invoice.";

const SCHEMA: &str = r#"SCHEMA: 2 sections

Section 1, "Tour Screen 1 (Summary)":
{
  "dateReserved": "MM/DD/YY",
  "vendor": "Normalized vendor name",
  "confirmationNumber": "String",
  "duration": "Number of days (string)",
  "numberOfTravellers": "String",
  "tripType": "International | Transborder | Domestic",
  "basePrice": "Amount in {home_currency}, 2 decimals (convert if needed)",
  "commission": "Amount in {home_currency}, 2 decimals",
  "finalPaymentDue": "MM/DD/YY",
  "invoiceRemarks": "Client-facing notes: discounts, inclusions summary",
  "agentRemarks": "Conversion and financial notes, required when the invoice is not in {home_currency}"
}

Section 2, "Tour Screen 2 (Details)":
{
  "serviceProviderName": "Tour or ground operator name",
  "startDate": "MM/DD/YY",
  "endDate": "MM/DD/YY",
  "category": "Category, class or tier code when shown",
  "description": "One or two sentence overview",
  "clientFeedback": "Day-by-day itinerary as plain text with line breaks: inclusions, meals, activities. No prices, commission or deposits."
}

OUTPUT:
[
  {"sectionTitle": "Tour Screen 1 (Summary)", "data": { ... }},
  {"sectionTitle": "Tour Screen 2 (Details)", "data": { ... }}
]"#;

pub(super) fn profile(rule_set: &str) -> PromptProfile {
    let vendor_rules = match rule_set {
        "travel_brands" => TRAVEL_BRANDS,
        _ => GENERIC,
    };

    PromptProfile {
        system: assemble(&[
            INTRO,
            vendor_rules,
            CONVERSION_REMARKS,
            GLOBAL_RULES,
            SCHEMA,
            ARRAY_ONLY,
        ]),
        closing: "Extract all tour data and return the JSON array of 2 section objects.",
        max_tokens: 4096,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_travel_brands_rules_only_for_that_rule_set() {
        assert!(profile("travel_brands").system.contains("TRAVEL BRANDS"));
        assert!(profile("generic").system.contains("GENERIC TOUR OPERATOR"));
        assert!(!profile("generic").system.contains("TRAVEL BRANDS"));
    }
}
