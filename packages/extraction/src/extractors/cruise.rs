use super::rules::{assemble, ARRAY_ONLY, CONVERSION_REMARKS, GLOBAL_RULES};
use super::PromptProfile;

const INTRO: &str = "\
You are the cruise extractor for a travel agency that keys bookings into ClientBase Online.
Read the invoice and return ONLY a JSON array of section objects.
Keep itinerary text blocks intact in clientItinerary.";

const SCHEMA: &str = r#"SCHEMA: 2 sections

Section 1, "Cruise Screen 1 (Summary)":
{
  "reservationDate": "MM/DD/YY",
  "vendorName": "Cruise line or booking vendor",
  "confirmationNumber": "String",
  "duration": "Number of nights (string)",
  "noofpax": "String, passengers",
  "noofunit": "String, cabins",
  "tripType": "International | Transborder | Domestic",
  "totalBase": "Amount in {home_currency}, 2 decimals",
  "totalTax": "String",
  "totalCommission": "String, supplier currency",
  "finalpymntduedate": "MM/DD/YY",
  "invoiceRemarks": "Client-facing notes, discounts, included items",
  "agentRemarks": "Conversion and financial notes"
}

Section 2, "Cruise Screen 2 (Details)":
{
  "shipName": "String",
  "startDate": "MM/DD/YY, embarkation",
  "endDate": "MM/DD/YY, debarkation",
  "category": "Cabin category code",
  "deck": "String",
  "cabinNumber": "String",
  "diningTime": "String",
  "bedding": "String",
  "description": "Stateroom description",
  "clientItinerary": "Plain text itinerary at a glance: port days, inclusions, line breaks"
}

OUTPUT:
[
  {"sectionTitle": "Cruise Screen 1 (Summary)", "data": { ... }},
  {"sectionTitle": "Cruise Screen 2 (Details)", "data": { ... }}
]"#;

pub(super) fn profile(_rule_set: &str) -> PromptProfile {
    PromptProfile {
        system: assemble(&[
            INTRO,
            GLOBAL_RULES,
            CONVERSION_REMARKS,
            SCHEMA,
            ARRAY_ONLY,
        ]),
        closing: "Extract all cruise data and return the JSON array of 2 section objects.",
        max_tokens: 4096,
    }
}
