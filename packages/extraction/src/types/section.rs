//! Extracted sections: the unit of pipeline output.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Title of the section a failed task is replaced with.
pub const EXTRACTION_ERROR_TITLE: &str = "Extraction Error";

/// One titled block of extracted data, mapped 1:1 to a booking-system screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(rename = "sectionTitle")]
    pub section_title: String,
    pub data: SectionData,
}

/// Section payload shapes.
///
/// Untagged: a JSON object is `KeyValue`, an array of objects is
/// `ObjectList`, a string is `Text`. Anything else fails to deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionData {
    KeyValue(Map<String, Value>),
    ObjectList(Vec<Map<String, Value>>),
    Text(String),
}

impl Section {
    pub fn new(title: impl Into<String>, data: SectionData) -> Self {
        Self {
            section_title: title.into(),
            data,
        }
    }

    /// Key/value section from `(key, value)` pairs, order preserved.
    pub fn key_value<K, V, I>(title: impl Into<String>, fields: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let map = fields
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::new(title, SectionData::KeyValue(map))
    }

    pub fn text(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(title, SectionData::Text(text.into()))
    }

    /// Synthetic section standing in for a failed task.
    pub fn extraction_error(reason: impl Into<String>) -> Self {
        let reason: String = reason.into();
        Self::key_value(EXTRACTION_ERROR_TITLE, [("error", reason)])
    }

    /// Placeholder for a booking type with no registered extractor.
    pub fn unknown_booking_type(booking_type: &str) -> Self {
        Self::key_value(
            format!("Unknown Booking Type: {}", booking_type),
            [(
                "error",
                format!("No extractor registered for type '{}'", booking_type),
            )],
        )
    }

    pub fn is_extraction_error(&self) -> bool {
        self.section_title == EXTRACTION_ERROR_TITLE
    }

    /// String field of a key/value section.
    pub fn field(&self, key: &str) -> Option<&str> {
        match &self.data {
            SectionData::KeyValue(map) => map.get(key).and_then(Value::as_str),
            _ => None,
        }
    }
}

impl SectionData {
    /// Short name of the payload shape, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SectionData::KeyValue(_) => "key_value",
            SectionData::ObjectList(_) => "object_list",
            SectionData::Text(_) => "text",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_shapes_deserialize_by_payload() {
        let sections: Vec<Section> = serde_json::from_value(json!([
            {"sectionTitle": "Hotel Screen 1 (Summary)", "data": {"vendor": "Expedia TAAP"}},
            {"sectionTitle": "Flight Screen 2 (Segments)", "data": [{"flightno": "123"}]},
            {"sectionTitle": "Profile Screen 4 (Preferences)", "data": "Seating: Aisle"}
        ]))
        .unwrap();

        assert_eq!(sections[0].data.kind(), "key_value");
        assert_eq!(sections[1].data.kind(), "object_list");
        assert_eq!(sections[2].data, SectionData::Text("Seating: Aisle".into()));
    }

    #[test]
    fn test_rejects_scalar_payload() {
        let result: Result<Section, _> =
            serde_json::from_value(json!({"sectionTitle": "x", "data": 42}));
        assert!(result.is_err());
    }

    #[test]
    fn test_key_value_preserves_field_order() {
        let section = Section::key_value("S", [("b", "2"), ("a", "1"), ("c", "3")]);
        let json = serde_json::to_string(&section).unwrap();
        assert_eq!(
            json,
            r#"{"sectionTitle":"S","data":{"b":"2","a":"1","c":"3"}}"#
        );
    }

    #[test]
    fn test_placeholder_wording() {
        let section = Section::unknown_booking_type("submarine_charter");
        assert_eq!(section.section_title, "Unknown Booking Type: submarine_charter");
        assert_eq!(
            section.field("error"),
            Some("No extractor registered for type 'submarine_charter'")
        );
        assert!(!section.is_extraction_error());
    }

    #[test]
    fn test_error_section() {
        let section = Section::extraction_error("boom");
        assert!(section.is_extraction_error());
        assert_eq!(
            serde_json::to_value(&section).unwrap(),
            json!({"sectionTitle": "Extraction Error", "data": {"error": "boom"}})
        );
    }
}
