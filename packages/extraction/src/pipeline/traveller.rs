//! Traveller name for the report and email subject.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::types::section::{Section, SectionData};

static PASSENGER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^Passenger:\s*(.+)$").expect("passenger pattern is valid"));

pub const UNKNOWN_TRAVELLER: &str = "Unknown";

fn non_empty(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Best guess at the lead traveller. First source that yields a name wins:
/// the document's `Passenger:` line, a passenger list section, a contact
/// section, then any `passengerName` field.
pub fn traveller_name(sections: &[Section], document: &str) -> String {
    if let Some(name) = PASSENGER_LINE
        .captures(document)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
    {
        return name.to_string();
    }

    let from_passenger_list = sections.iter().find_map(|section| match &section.data {
        SectionData::ObjectList(items) if section.section_title.contains("Passengers") => {
            items.first().and_then(|first| non_empty(first, "passengerName"))
        }
        _ => None,
    });
    if let Some(name) = from_passenger_list {
        return name;
    }

    let from_contact = sections.iter().find_map(|section| match &section.data {
        SectionData::KeyValue(map) if section.section_title.contains("Contact") => {
            let first = non_empty(map, "firstName").unwrap_or_default();
            let last = non_empty(map, "lastName").unwrap_or_default();
            let full = format!("{} {}", first, last).trim().to_string();
            (!full.is_empty()).then_some(full)
        }
        _ => None,
    });
    if let Some(name) = from_contact {
        return name;
    }

    sections
        .iter()
        .find_map(|section| match &section.data {
            SectionData::KeyValue(map) => non_empty(map, "passengerName"),
            _ => None,
        })
        .unwrap_or_else(|| UNKNOWN_TRAVELLER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sections(value: Value) -> Vec<Section> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_document_line_wins() {
        let sections = sections(json!([
            {"sectionTitle": "Flight Screen 3 (Passengers)", "data": [{"passengerName": "SMITH/JOHN"}]}
        ]));
        let document = "VENDOR: Westjet\npassenger:  Jane Doe \nPNR: X1";

        assert_eq!(traveller_name(&sections, document), "Jane Doe");
    }

    #[test]
    fn test_passenger_list_before_contact() {
        let sections = sections(json!([
            {"sectionTitle": "Profile Screen 1 (Contact)", "data": {"firstName": "Ann", "lastName": "Lee"}},
            {"sectionTitle": "Flight Screen 3 (Passengers)", "data": [
                {"passengerName": "SMITH/JOHN MR"},
                {"passengerName": "SMITH/JANE MRS"}
            ]}
        ]));

        assert_eq!(traveller_name(&sections, ""), "SMITH/JOHN MR");
    }

    #[test]
    fn test_contact_joins_names() {
        let sections = sections(json!([
            {"sectionTitle": "Profile Screen 1 (Contact)", "data": {"firstName": "John & Jane", "lastName": "Smith"}}
        ]));
        assert_eq!(traveller_name(&sections, ""), "John & Jane Smith");

        let only_last = sections_with_last_name();
        assert_eq!(traveller_name(&only_last, ""), "Smith");
    }

    fn sections_with_last_name() -> Vec<Section> {
        sections(json!([
            {"sectionTitle": "Profile Screen 1 (Contact)", "data": {"lastName": "Smith"}}
        ]))
    }

    #[test]
    fn test_any_passenger_name_then_unknown() {
        let with_field = sections(json!([
            {"sectionTitle": "Rail Screen 1 (Summary)", "data": {"passengerName": "Ravi Patel"}}
        ]));
        assert_eq!(traveller_name(&with_field, ""), "Ravi Patel");

        let without = sections(json!([
            {"sectionTitle": "Hotel Screen 1 (Summary)", "data": {"vendor": "Expedia TAAP"}},
            {"sectionTitle": "Profile Screen 4 (Preferences)", "data": "Seating: Aisle"}
        ]));
        assert_eq!(traveller_name(&without, "no passenger here"), UNKNOWN_TRAVELLER);
    }
}
