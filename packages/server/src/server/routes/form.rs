use axum::response::Html;
use extraction::BookingType;

const FORM_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Submit Invoice</title>
  <style>
    body { font-family: system-ui, sans-serif; max-width: 560px; margin: 40px auto; padding: 0 16px; color: #111827; }
    h1 { font-size: 1.4rem; }
    label { display: block; font-weight: 600; margin: 16px 0 4px; }
    input[type="text"], input[type="number"], input[type="url"], select { width: 100%; padding: 8px; border: 1px solid #d1d5db; border-radius: 4px; box-sizing: border-box; }
    .hint { font-size: 0.8em; color: #6b7280; margin-top: 2px; }
    button { margin-top: 24px; padding: 10px 20px; background: #2563eb; color: #fff; border: 0; border-radius: 4px; font-size: 1rem; cursor: pointer; }
  </style>
</head>
<body>
  <h1>Submit Invoice</h1>
  <form action="/process-invoice" method="post" enctype="multipart/form-data">
    <label for="vendor">Vendor</label>
    <input type="text" id="vendor" name="vendor" required placeholder="e.g. Westjet, Expedia, Viator">

    <label for="booking_type_hint">Booking type</label>
    <select id="booking_type_hint" name="booking_type_hint">
      <option value="">Auto-detect</option>
"#;

const FORM_TAIL: &str = r#"    </select>

    <label for="service_fee">Service fee</label>
    <input type="number" id="service_fee" name="service_fee" value="0" min="0" step="0.01">
    <p class="hint">Agency planning fee. Leave at 0 for none.</p>

    <label for="files">Invoice files</label>
    <input type="file" id="files" name="files" multiple required accept=".pdf,.eml,.md,.txt">
    <p class="hint">PDF, forwarded email (.eml) or text. Several files make one booking.</p>

    <button type="submit">Process invoice</button>
  </form>
</body>
</html>
"#;

/// Booking type options, one per known type.
fn booking_type_options() -> String {
    BookingType::ALL
        .iter()
        .map(|t| {
            format!(
                "      <option value=\"{}\">{}</option>\n",
                t.as_str(),
                t.display_name()
            )
        })
        .collect()
}

pub fn form_html() -> String {
    format!("{}{}{}", FORM_HEAD, booking_type_options(), FORM_TAIL)
}

/// `GET /form`
pub async fn form_handler() -> Html<String> {
    Html(form_html())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_offers_every_booking_type() {
        let html = form_html();

        assert!(html.contains(r#"<option value="">Auto-detect</option>"#));
        for t in BookingType::ALL {
            assert!(html.contains(&format!("value=\"{}\"", t.as_str())));
        }
        assert!(html.contains(r#"name="vendor" required"#));
        assert!(html.contains(r#"name="files" multiple"#));
    }
}
