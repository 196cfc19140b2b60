use super::rules::{assemble, ARRAY_ONLY, GLOBAL_RULES};
use super::PromptProfile;

const INTRO: &str = "\
You are the hotel extractor for a travel agency that keys bookings into ClientBase Online.
Read the invoice and return ONLY a JSON array of section objects.";

const EXPEDIA: &str = "\
VENDOR RULES: EXPEDIA TAAP (hotel)

baseAmount: the \"Room price\" / \"Subtotal\" line already includes taxes and fees, so
  baseAmount = Subtotal - Taxes & fees.
  Example: CA $1,402.02 - CA $127.44 = 1274.58
taxAmount: the \"Taxes & fees\" line only. Never add \"Due at property\" or
  \"City/local tax\"; the client pays those at the hotel.
commissionAmount: the figure on the \"Total Earnings\" line, verbatim.
Due at property: record it in notesForClient as
  \"Due at property: CA $X.XX (city/local tax)\"";

const GENERIC: &str = "\
VENDOR RULES: GENERIC HOTEL

Copy base amount, tax amount and commission exactly as shown. Amounts labelled
\"Due at property\", \"City tax\" or \"Local tax\" go in notesForClient, never in taxAmount.";

const SCHEMA: &str = r#"SCHEMA: 2 sections

Section 1, "Hotel Screen 1 (Summary)":
{
  "bookingDate": "MM/DD/YY",
  "vendor": "Normalized vendor name",
  "confirmationNumber": "String",
  "recordLocator": "String",
  "numberOfNights": "String",
  "numberOfGuests": "String",
  "numberOfUnits": "String (rooms)",
  "category": "International | Transborder | Domestic",
  "baseAmount": "Number, 2 decimals, in {home_currency} (convert if needed)",
  "taxAmount": "Number, 2 decimals",
  "commissionAmount": "Number, 2 decimals",
  "agentRemarks": "Conversion details, required when the invoice is not in {home_currency}"
}

Section 2, "Hotel Screen 2 (Details)":
{
  "serviceProviderName": "Full hotel name",
  "checkInDate": "MM/DD/YY",
  "checkOutDate": "MM/DD/YY",
  "checkInTime": "H:MM AM/PM, '3:00 PM' when not stated",
  "checkOutTime": "H:MM AM/PM, '11:00 AM' when not stated",
  "roomCategory": "Room category or class code",
  "roomDescription": "Room type description",
  "beddingType": "e.g. King, 2 Queens, Twin",
  "notesForClient": "Must include the hotel's full address, phone and email; any amount due at the property; any promotional savings applied"
}

OUTPUT:
[
  {"sectionTitle": "Hotel Screen 1 (Summary)", "data": { ... }},
  {"sectionTitle": "Hotel Screen 2 (Details)", "data": { ... }}
]"#;

pub(super) fn profile(rule_set: &str) -> PromptProfile {
    let vendor_rules = match rule_set {
        "expedia" => EXPEDIA,
        _ => GENERIC,
    };

    PromptProfile {
        system: assemble(&[INTRO, vendor_rules, GLOBAL_RULES, SCHEMA, ARRAY_ONLY]),
        closing: "Extract all hotel data and return the JSON array of 2 section objects.",
        max_tokens: 3000,
    }
}
