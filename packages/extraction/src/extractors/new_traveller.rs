use super::rules::{assemble, ARRAY_ONLY, GLOBAL_RULES};
use super::PromptProfile;

const INTRO: &str = "\
You are the traveller-profile extractor for a travel agency that keys profiles into ClientBase Online.
Read the profile document and return ONLY a JSON array of section objects.";

const PROFILE_RULES: &str = "\
PROFILE FORMATTING:
- state / province: 2-letter code (ON, BC, AB, NY)
- citizenship: 2-letter ISO country code (CA, US, GB)
- birthMonth: full month name (July); birthDay: 1-2 digits; birthYear: 4 digits
- phoneAreaCode: exactly 3 digits; phoneNumber: exactly 7 digits, no spaces or dashes
- Contact firstName for a couple reads \"John & Jane\"";

const SCHEMA: &str = r#"SCHEMA: sections 1, 2 and 4 always; section 3 only for a second traveller

Section 1, "Profile Screen 1 (Contact)", one per household:
{
  "lastName": "String",
  "firstName": "String",
  "middlenames": "String",
  "address1": "Street address line 1",
  "address2": "Street address line 2",
  "aptSuite": "Apartment or suite",
  "zipCode": "Postal or ZIP code",
  "city": "City",
  "state": "2-letter code",
  "country": "Country name",
  "phoneAreaCode": "3 digits",
  "phoneNumber": "7 digits"
}

Section 2, "Profile Screen 2 (Traveller 1)" and Section 3, "Profile Screen 3 (Traveller 2)":
{
  "lastName": "String",
  "firstName": "String",
  "middlenames": "String",
  "citizenship": "2-letter ISO code",
  "birthMonth": "Full month name",
  "birthDay": "1-2 digits",
  "birthYear": "4 digits",
  "email": "String"
}

Section 4, "Profile Screen 4 (Preferences)", a plain text string laid out as:
Emergency Contact
-----------------
Name: [Name]
Phone: [Phone]
Email: [Email]

Travel Preferences
------------------
Seating: [Value]
Class: [Value]
Dietary: [Value]

Destinations of Interest
------------------------
[List]

Loyalty Numbers
---------------
[Airline/Program]: [Number]

OUTPUT:
[
  {"sectionTitle": "Profile Screen 1 (Contact)", "data": { ... }},
  {"sectionTitle": "Profile Screen 2 (Traveller 1)", "data": { ... }},
  {"sectionTitle": "Profile Screen 3 (Traveller 2)", "data": { ... }},
  {"sectionTitle": "Profile Screen 4 (Preferences)", "data": "plain text"}
]"#;

pub(super) fn profile(_rule_set: &str) -> PromptProfile {
    PromptProfile {
        system: assemble(&[INTRO, GLOBAL_RULES, PROFILE_RULES, SCHEMA, ARRAY_ONLY]),
        closing: "Extract all traveller profile data and return the JSON array of section objects.",
        max_tokens: 3000,
    }
}
