use super::rules::{assemble, ARRAY_ONLY, GLOBAL_RULES};
use super::PromptProfile;

const INTRO: &str = "\
You are the insurance extractor for a travel agency that keys bookings into ClientBase Online.
Read the policy document and return ONLY a JSON array of section objects.";

const SPECIAL: &str = "\
SPECIAL RULES:
- vendorName is always \"Manulife Insurance\", whatever the document says.
- confirmationNumber keeps digits only: \"AGX123456\" becomes \"123456\".
- totalBase is the premium before tax.
- totalCommission is the commission as a number.
- noofpax and noofunits are 1 per policy.
- description reads \"[Plan Type] - [Traveller Name]\", e.g. \"All-Inclusive Single Trip - John Smith\".";

const SCHEMA: &str = r#"SCHEMA: 2 sections

Section 1, "Insurance Screen 1 (Summary)":
{
  "reservationDate": "MM/DD/YY",
  "vendorName": "Manulife Insurance",
  "confirmationNumber": "Digits only",
  "duration": <integer, days covered>,
  "noofpax": 1,
  "noofunits": 1,
  "tripType": "International | Transborder | Domestic",
  "totalBase": <number, premium before tax, 2 decimals>,
  "totalCommission": <number, 2 decimals>
}

Section 2, "Insurance Screen 2 (Details)":
{
  "startDate": "MM/DD/YY",
  "endDate": "MM/DD/YY",
  "description": "[Plan Type] - [Traveller Name]"
}

OUTPUT:
[
  {"sectionTitle": "Insurance Screen 1 (Summary)", "data": { ... }},
  {"sectionTitle": "Insurance Screen 2 (Details)", "data": { ... }}
]"#;

pub(super) fn profile(_rule_set: &str) -> PromptProfile {
    PromptProfile {
        system: assemble(&[INTRO, GLOBAL_RULES, SPECIAL, SCHEMA, ARRAY_ONLY]),
        closing: "Extract all insurance policy data and return the JSON array of 2 section objects.",
        max_tokens: 2000,
    }
}
