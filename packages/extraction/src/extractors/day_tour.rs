use super::rules::{assemble, ARRAY_ONLY, CONVERSION_REMARKS, GLOBAL_RULES};
use super::PromptProfile;

const INTRO: &str = "\
You are the day-tour extractor for a travel agency that keys bookings into ClientBase Online.
Day excursions, shore excursions and single-day activities go to the Misc screens.
Read the invoice and return ONLY a JSON array of section objects.";

const VIATOR: &str = "\
VENDOR RULES: VIATOR ON LINE

confirmationNumber is ALWAYS the reference starting with \"BR\" (e.g. \"BR-123456789\").
Individual activity or itinerary numbers belong in invoiceRemarks.
Commission defaults to 8% of the original invoice price, kept in the invoice currency,
unless the invoice states another percentage or amount.
One booking may hold several activities: emit one Screen 2 section per activity.";

const SCHEMA: &str = r#"SCHEMA: 1 summary section plus 1 details section per activity

Section 1, "Day Tour Screen 1 (Summary)", exactly once:
{
  "dateReserved": "MM/DD/YY",
  "vendor": "Viator on Line",
  "confirmationNumber": "The 'BR' reference",
  "duration": "Number of days the booking spans (string)",
  "numberOfTravellers": "String",
  "tripType": "International | Transborder | Domestic",
  "basePrice": "Total base price in {home_currency}, 2 decimals",
  "commission": "Commission in the original currency, 2 decimals",
  "finalPaymentDue": "MM/DD/YY",
  "serviceProviderName": "Viator on Line",
  "startDate": "MM/DD/YY, earliest activity",
  "endDate": "MM/DD/YY, latest activity",
  "description": "One or two sentence overview",
  "invoiceRemarks": "Client-facing notes: activity numbers, promotions, voucher info",
  "agentremarks": "Conversion and financial notes when not in {home_currency}"
}

Section 2, "Day Tour Screen 2 (Details)", repeated once per activity:
{
  "serviceProviderName": "The actual activity operator, not Viator",
  "startDate": "MM/DD/YY, activity date",
  "endDate": "MM/DD/YY, same as startDate for a single day",
  "description": "One or two sentence description of this activity",
  "clientfeedback": "Start time, meeting point, duration, what to bring, dress code, cancellation policy, voucher redemption. Plain text, no prices.",
  "agentremarks": "Agent notes, if any"
}

OUTPUT (every details section uses the same title):
[
  {"sectionTitle": "Day Tour Screen 1 (Summary)", "data": { ... }},
  {"sectionTitle": "Day Tour Screen 2 (Details)", "data": { ... }},
  {"sectionTitle": "Day Tour Screen 2 (Details)", "data": { ... }}
]"#;

/// Viator is the only day-tour vendor, so every rule set gets its rules.
pub(super) fn profile(_rule_set: &str) -> PromptProfile {
    PromptProfile {
        system: assemble(&[
            INTRO,
            VIATOR,
            CONVERSION_REMARKS,
            GLOBAL_RULES,
            SCHEMA,
            ARRAY_ONLY,
        ]),
        closing: "Extract all day tour data and return the JSON array. \
                  Remember: one Screen 2 section per individual day tour/activity on this booking.",
        max_tokens: 4096,
    }
}
