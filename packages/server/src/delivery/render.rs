//! Email subject and HTML body for a run report.

use std::collections::HashMap;

use chrono::{DateTime, Local};
use extraction::{RunReport, Section, SectionData};
use serde_json::{Map, Value};

const LABEL_CELL: &str = "padding:4px 8px;border:1px solid #d1d5db;background:#f3f4f6;\
font-weight:600;vertical-align:top;width:35%";
const VALUE_CELL: &str = "padding:4px 8px;border:1px solid #d1d5db;font-family:monospace;\
white-space:pre-wrap";
const TABLE: &str = "border-collapse:collapse;width:100%;margin:4px 0 8px";

/// Booking types as a display list: `flight`, `day_tour` → `Flight + Day Tour`.
pub fn booking_types_label(booking_types: &[String]) -> String {
    if booking_types.is_empty() {
        return "Unknown".to_string();
    }

    booking_types
        .iter()
        .map(|t| title_case(&t.replace('_', " ")))
        .collect::<Vec<_>>()
        .join(" + ")
}

fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn subject(report: &RunReport) -> String {
    format!(
        "Invoice: {} — {} ({})",
        report.traveller_name,
        report.vendor,
        booking_types_label(&report.booking_types)
    )
}

/// Titles as shown in the email. Repeated titles get an `i of n` suffix.
pub fn display_titles(sections: &[Section]) -> Vec<String> {
    let mut totals: HashMap<&str, usize> = HashMap::new();
    for section in sections {
        *totals.entry(section.section_title.as_str()).or_default() += 1;
    }

    let mut seen: HashMap<&str, usize> = HashMap::new();
    sections
        .iter()
        .map(|section| {
            let title = section.section_title.as_str();
            let total = totals.get(title).copied().unwrap_or(1);
            if total > 1 {
                let n = seen.entry(title).or_default();
                *n += 1;
                format!("{} — {} of {}", title, n, total)
            } else {
                title.to_string()
            }
        })
        .collect()
}

pub fn html_body(report: &RunReport, sent_at: DateTime<Local>) -> String {
    let mut body = String::new();

    if let Some(error) = report.error.as_deref().filter(|_| !report.is_success()) {
        body.push_str(&format!(
            "<div style=\"background:#fef2f2;border:1px solid #fca5a5;padding:12px;margin-bottom:20px\">\
             <strong style=\"color:#b91c1c\">Processing Error</strong>\
             <pre style=\"white-space:pre-wrap;margin:6px 0 0\">{}</pre></div>",
            escape(error)
        ));
    }

    for (section, title) in report.sections.iter().zip(display_titles(&report.sections)) {
        body.push_str(&section_block(section, &title));
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"></head>\n\
         <body style=\"font-family:sans-serif;max-width:720px;margin:0 auto;padding:20px\">\n\
         <h1 style=\"margin:0;font-size:1.3rem\">{}</h1>\n\
         <p style=\"color:#6b7280;margin:4px 0 20px\">{} &middot; {} &middot; {}</p>\n\
         {}\n</body>\n</html>",
        escape(&report.traveller_name),
        escape(&report.vendor),
        escape(&booking_types_label(&report.booking_types)),
        sent_at.format("%b %d, %Y at %I:%M %p"),
        body
    )
}

fn section_block(section: &Section, title: &str) -> String {
    let content = match &section.data {
        SectionData::KeyValue(map) => kv_table(map),
        SectionData::ObjectList(items) if items.is_empty() => "<em>Empty</em>".to_string(),
        SectionData::ObjectList(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                format!(
                    "<p style=\"margin:6px 0 0;color:#6b7280\">#{}</p>{}",
                    i + 1,
                    kv_table(item)
                )
            })
            .collect(),
        SectionData::Text(text) => format!(
            "<pre style=\"white-space:pre-wrap;background:#f9fafb;padding:10px\">{}</pre>",
            escape(text)
        ),
    };

    let raw = serde_json::to_string_pretty(&section.data).unwrap_or_default();

    format!(
        "<div style=\"margin-bottom:28px\">\
         <h3 style=\"margin:0 0 6px;color:#1d4ed8\">{}</h3>{}\
         <p style=\"margin:8px 0 2px;font-size:0.75em;color:#6b7280\">Raw JSON</p>\
         <pre style=\"background:#1f2937;color:#f9fafb;padding:10px;overflow-x:auto\">{}</pre>\
         </div>",
        escape(title),
        content,
        escape(&raw)
    )
}

fn kv_table(map: &Map<String, Value>) -> String {
    let rows: String = map
        .iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            format!(
                "<tr><td style=\"{}\">{}</td><td style=\"{}\">{}</td></tr>",
                LABEL_CELL,
                escape(key),
                VALUE_CELL,
                escape(&value)
            )
        })
        .collect();

    format!("<table style=\"{}\">{}</table>", TABLE, rows)
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
