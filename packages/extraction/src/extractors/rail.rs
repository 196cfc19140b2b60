use super::rules::{assemble, ARRAY_ONLY, GLOBAL_RULES};
use super::PromptProfile;

const INTRO: &str = "\
You are the rail extractor for a travel agency that keys bookings into ClientBase Online.
Rail bookings are entered as Miscellaneous bookings.
Read the invoice and return ONLY a JSON array of 2 section objects.";

const GENERIC: &str = "\
VENDOR RULES: RAIL (GENERIC)

Rail is usually non-commissionable: 0% unless the invoice shows a commission figure.
confirmationNumber is the primary booking reference; join several with '/' (e.g. 'REF123/REF456').
Each segment may carry its own ticket number. List every ticket and reference in
clientFeedback, one line per segment.";

const SCHEMA: &str = r#"SCHEMA: 2 sections

Section 1, "Rail Screen 1 (Summary)":
{
  "reservationDate": "MM/DD/YY",
  "vendorName": "Rail operator (e.g. VIA Rail, Amtrak, Eurostar, Rail Europe)",
  "confirmationNumber": "Primary reference; join several with '/'",
  "duration": <integer, days from first departure to last arrival>,
  "noofpax": <integer>,
  "noofunits": <integer, rail segments>,
  "tripType": "Domestic | Transborder | International",
  "totalBase": <number, total fare, 2 decimals>,
  "totalTax": <taxes and fees when shown; omit otherwise>,
  "commissionAmount": "0%",
  "gstStatus": "GST Included | GST Not Included"
}
tripType follows the stations: Domestic when all are in Canada, Transborder for
Canada/USA only, International otherwise.

Section 2, "Rail Screen 2 (Details)":
{
  "serviceProviderName": "Rail operator",
  "startDate": "MM/DD/YY, first departure",
  "endDate": "MM/DD/YY, last arrival",
  "clientFeedback": "One line per segment, format below"
}

clientFeedback lines:
  [Origin] -> [Destination] | [Date] | Train: [Service/Train#] | Ticket: [Ticket#] | Ref: [Ref#]
  Leave out Ticket or Ref when not shown. Passengers with their own tickets on the same
  segment get one line each. Several PDFs are consolidated into one block, in order.
  Example:
    Vancouver -> Winnipeg | 08/26/24 | Train: VIA 1 (The Canadian) | Ticket: 1234567 | Ref: ABC123

OUTPUT:
[
  {"sectionTitle": "Rail Screen 1 (Summary)", "data": { ... }},
  {"sectionTitle": "Rail Screen 2 (Details)", "data": { ... }}
]"#;

/// Only the generic rule set exists for rail today.
pub(super) fn profile(_rule_set: &str) -> PromptProfile {
    PromptProfile {
        system: assemble(&[INTRO, GENERIC, GLOBAL_RULES, SCHEMA, ARRAY_ONLY]),
        closing: "Extract all rail booking data and return the JSON array of 2 section objects.",
        max_tokens: 4096,
    }
}
