use super::rules::{assemble, ARRAY_ONLY, GLOBAL_RULES};
use super::PromptProfile;

const INTRO: &str = "\
You are the flight extractor for a travel agency that keys bookings into ClientBase Online.
Read the invoice and return ONLY a JSON array of section objects.";

const AIR_CANADA: &str = "\
VENDOR RULES: AIR CANADA INTERNET

Commission applies to base fare, surcharges and stopover charges. It never applies to
taxes, change fees, seat selection, meals, upgrades, infants without a seat, SMB tickets
(PN#) or corporate contract tickets.

Tour code ACTOT is mandatory everywhere except North America and Sun destinations. When it
is missing or wrong, add to invoiceRemarks:
  \"ACTOT REQUIRED - VERIFY: ticketing error fee applies (min $50)\"

Combining Service Canada with Sun, South America, Transatlantic or Transpacific on one
ticket: the LOWER rate applies to the whole ticket.
Mixed classes, North America: lowest rate. Mixed classes, international: rate of the lowest
booking class among the international segments; domestic feeder legs do not downgrade it.

JV carriers, Transatlantic: Air Canada, Lufthansa, Austrian, Swiss, Brussels Airlines,
Edelweiss, Discover, United. JV carriers, Mainland China: Air Canada, Air China.

Rates by fare basis:
  0%  Economy Basic, fare basis ending BA, BV, BQ or LGT (all regions)
  3%  North America & Sun, Economy Standard (fare basis ending TG)
  3%  International interline on non-JV partners
  4%  North America & Sun, all other Economy, Premium Economy, Business
  5%  International online, AC or JV operated";

const WESTJET: &str = "\
VENDOR RULES: WESTJET INTERNET

Call Centre bookings are always 0%; calculate nothing.
Multiple fare classes on one ticket: use the HIGHER commission.

Rates by RBD class (Domestic/Transborder | Latin America & Caribbean | Transatlantic/ROW):
  E                  0% |  0% |  0%
  L K T X S N Q H    3% |  7% |  7%
  M B Y              5% |  8% |  9%
  R O W              8% |  8% | 10%
  D C J             10% |  8% | 15%";

const ADX_INTAIR: &str = "\
VENDOR RULES: ADX / INTAIR

When the invoice has a line labelled \"COMMISSION\" with a dollar amount, use that exact
figure for totalCommission and commission. Never compute a percentage.

Locators:
  confirmationNumber = value next to \"TRIP REF\"
  recordLocator      = value next to \"PNR\"
  ticketNumber       = value next to \"TICKET NUMBER\"";

const TOURCAN: &str = "\
VENDOR RULES: TOURCAN VACATIONS

The \"TOTAL CREDIT\" line carries a negative amount (e.g. \"TOTAL CREDIT -75.00\"). Its
absolute value is totalCommission and each passenger's commission. Never compute a
percentage.";

const GENERIC: &str = "\
VENDOR RULES: GENERIC

Copy commission percentage or amount exactly as shown. Use the PNR as recordLocator.";

/// Screen 1 for vendors that ticket per passenger; totals live on Screen 3.
const SUMMARY_TICKETED: &str = r#"Section 1, "Flight Screen 1 (Summary)":
{
  "reservationDate": "MM/DD/YY",
  "vendorName": "Normalized vendor name (e.g. Air Canada Internet)",
  "confirmationNumber": "String",
  "recordLocator": "String; join several locators with '/' (e.g. 'ABC123/XYZ789')",
  "duration": <integer, total trip days>,
  "invoiceRemarks": "Seat selections block (see seat rules)"
}"#;

const SUMMARY_WITH_TOTALS: &str = r#"Section 1, "Flight Screen 1 (Summary)":
{
  "reservationDate": "MM/DD/YY",
  "vendorName": "Normalized vendor name (e.g. Air Canada Internet)",
  "confirmationNumber": "String",
  "recordLocator": "String; join several locators with '/' (e.g. 'ABC123/XYZ789')",
  "duration": <integer, total trip days>,
  "totalBase": <number, 2 decimals>,
  "totalTax": <number, carrier surcharges and fees>,
  "totalCommission": "Percentage (e.g. '4%') or exact dollar amount",
  "invoiceRemarks": "Seat selections block (see seat rules)"
}"#;

const BODY: &str = r#"SEAT RULES for invoiceRemarks:
  Scan the whole document for seat assignments. One line per segment:
    [Flight Number]: [Pax Name] ([Seat]) | [Pax Name] ([Seat])
  Unknown seats: [Flight Number]: Seat: N/A  (check airline site)
  Example:
    Seat Selections
    ---------------
    AC123: J. Smith (12A) | M. Smith (12B)
    AC456: Seat: N/A

Section 2, "Flight Screen 2 (Segments)", an array with one object per leg:
[
  {
    "serviceprovidercode": "2-letter IATA airline code",
    "serviceprovidername": "Full airline name",
    "flightno": "Flight number digits only",
    "departcitycode": "3-letter IATA airport code",
    "departcityname": "City name",
    "startdate": "MM/DD/YY",
    "starttime": "H:MM AM/PM",
    "arrivecitycode": "3-letter IATA airport code",
    "arrivecityname": "City name",
    "enddate": "MM/DD/YY",
    "endtime": "H:MM AM/PM"
  }
]

Section 3, "Flight Screen 3 (Passengers)", an array with one object per passenger:
{
  "passengerName": "Full Name",
  "ticketNumber": "Drop the 3-digit airline prefix: '0141234567890' becomes '1234567890'",
  "basePricePerPassenger": <number, 2 decimals>,
  "taxPerPassenger": <number, 2 decimals>,
  "commission": "Percentage (e.g. '4%') or exact dollar amount"
}

SEAT CHARGES (only when the invoice shows seat selection charges with a dollar amount;
otherwise stop after Section 3):

Section 4, "Seat Screen 1 (Summary)":
{
  "reservationDate": "MM/DD/YY, same as the flight",
  "vendorName": "Same vendor as the flight",
  "confirmationNumber": "Same as the flight",
  "duration": <integer, same trip duration>,
  "noofpax": <integer, passengers charged for seats>,
  "noofunits": <integer, seat assignments charged>,
  "tripType": "Domestic | Transborder | International",
  "totalBase": <number, total seat charges, 2 decimals>,
  "totalTax": <tax on seat charges when shown>,
  "commissionAmount": "0%",
  "includegst": "Include GST/HST | Do Not Include GST/HST"
}
tripType follows the flight route: Domestic when every segment is inside Canada,
Transborder for Canada/USA only, International for anything else.

Section 5, "Seat Screen 2 (Details)":
{
  "serviceProviderName": "Airline name",
  "startDate": "MM/DD/YY, first departure",
  "endDate": "MM/DD/YY, last arrival",
  "description": "Seat Selection Fees - [seat-by-flight list from invoiceRemarks]"
}

OUTPUT:
[
  {"sectionTitle": "Flight Screen 1 (Summary)", "data": { ... }},
  {"sectionTitle": "Flight Screen 2 (Segments)", "data": [ ... ]},
  {"sectionTitle": "Flight Screen 3 (Passengers)", "data": [ ... ]},
  {"sectionTitle": "Seat Screen 1 (Summary)", "data": { ... }},
  {"sectionTitle": "Seat Screen 2 (Details)", "data": { ... }}
]
(the two Seat sections only when seat charges exist)"#;

/// Rule sets whose passengers are ticketed individually on Screen 3.
const TICKETING_RULE_SETS: [&str; 3] = ["air_canada", "westjet", "adx_intair"];

pub(super) fn profile(rule_set: &str) -> PromptProfile {
    let vendor_rules = match rule_set {
        "air_canada" => AIR_CANADA,
        "westjet" => WESTJET,
        "adx_intair" => ADX_INTAIR,
        "tourcan" => TOURCAN,
        _ => GENERIC,
    };

    let summary = if TICKETING_RULE_SETS.contains(&rule_set) {
        SUMMARY_TICKETED
    } else {
        SUMMARY_WITH_TOTALS
    };

    PromptProfile {
        system: assemble(&[
            INTRO,
            vendor_rules,
            GLOBAL_RULES,
            "SCHEMA: 3 sections, or 5 when seat charges are present",
            summary,
            BODY,
            ARRAY_ONLY,
        ]),
        closing: "Extract all flight data and return the JSON array of sections \
                  (3 sections, or 5 if seat charges are present).",
        max_tokens: 8192,
    }
}
