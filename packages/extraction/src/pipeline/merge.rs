//! Flattening task outcomes into the run's section list.

use tracing::warn;

use super::dispatch::TaskOutcome;
use crate::types::section::Section;

/// Splice outcomes together in the order given.
///
/// Each outcome contributes at least one section: a failure, or a success
/// with nothing in it, becomes a single `Extraction Error` section in its slot.
pub fn merge(outcomes: Vec<TaskOutcome>) -> Vec<Section> {
    let mut merged = Vec::with_capacity(outcomes.len() * 2);

    for outcome in outcomes {
        match outcome.result {
            Ok(sections) if sections.is_empty() => {
                warn!(
                    task_index = outcome.index,
                    booking_type = %outcome.label,
                    "Task returned no sections"
                );
                merged.push(Section::extraction_error(format!(
                    "{} extractor returned no sections",
                    outcome.label
                )));
            }
            Ok(sections) => merged.extend(sections),
            Err(e) => merged.push(Section::extraction_error(e.to_string())),
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractionError;
    use crate::pipeline::dispatch::TaskLabel;
    use crate::types::section::EXTRACTION_ERROR_TITLE;
    use proptest::prelude::*;

    fn ok(index: usize, titles: &[&str]) -> TaskOutcome {
        TaskOutcome {
            index,
            label: TaskLabel::Booking(format!("task{}", index)),
            result: Ok(titles
                .iter()
                .map(|t| Section::key_value(*t, [("k", "v")]))
                .collect()),
        }
    }

    fn failed(index: usize, reason: &str) -> TaskOutcome {
        TaskOutcome {
            index,
            label: TaskLabel::ServiceFee,
            result: Err(ExtractionError::Normalization(reason.to_string())),
        }
    }

    fn titles(sections: &[Section]) -> Vec<&str> {
        sections.iter().map(|s| s.section_title.as_str()).collect()
    }

    #[test]
    fn test_failure_keeps_its_slot() {
        let merged = merge(vec![
            ok(0, &["A1", "A2"]),
            failed(1, "model unavailable"),
            ok(2, &["C1"]),
        ]);

        assert_eq!(titles(&merged), vec!["A1", "A2", EXTRACTION_ERROR_TITLE, "C1"]);
        assert_eq!(
            merged[2].field("error"),
            Some("normalization failed: model unavailable")
        );
    }

    #[test]
    fn test_empty_success_still_contributes() {
        let merged = merge(vec![ok(0, &[]), ok(1, &["B"])]);

        assert_eq!(titles(&merged), vec![EXTRACTION_ERROR_TITLE, "B"]);
        assert_eq!(
            merged[0].field("error"),
            Some("task0 extractor returned no sections")
        );
    }

    #[test]
    fn test_repeated_titles_are_kept() {
        let merged = merge(vec![ok(0, &[
            "Day Tour Screen 1 (Summary)",
            "Day Tour Screen 2 (Details)",
            "Day Tour Screen 2 (Details)",
        ])]);

        assert_eq!(merged.len(), 3);
    }

    proptest! {
        /// Each slot yields max(1, n) sections and slots never interleave
        #[test]
        fn prop_slots_are_contiguous(slots in prop::collection::vec(prop::option::of(0usize..4), 0..8)) {
            let outcomes: Vec<TaskOutcome> = slots
                .iter()
                .enumerate()
                .map(|(i, slot)| match slot {
                    Some(n) => {
                        let names: Vec<String> = (0..*n).map(|j| format!("{}:{}", i, j)).collect();
                        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
                        ok(i, &refs)
                    }
                    None => failed(i, "boom"),
                })
                .collect();

            let merged = merge(outcomes);

            let expected: usize = slots.iter().map(|s| s.unwrap_or(1).max(1)).sum();
            prop_assert_eq!(merged.len(), expected);

            let mut cursor = 0;
            for (i, slot) in slots.iter().enumerate() {
                match slot {
                    Some(n) if *n > 0 => {
                        for j in 0..*n {
                            let want = format!("{}:{}", i, j);
                            prop_assert_eq!(merged[cursor].section_title.as_str(), want.as_str());
                            cursor += 1;
                        }
                    }
                    _ => {
                        prop_assert!(merged[cursor].is_extraction_error());
                        cursor += 1;
                    }
                }
            }
        }
    }
}
