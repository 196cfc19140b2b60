//! Forwarded invoice emails.
//!
//! Only what the normalizer needs: the readable body and any PDF
//! attachments. Attachment payloads never end up in the body text.

use mail_parser::{Message, MessageParser, MessagePart, MimeHeaders, PartType};
use tracing::{debug, warn};

use crate::types::document::DocumentFile;

const MAX_DEPTH: usize = 8;
const DEFAULT_PDF_NAME: &str = "attachment.pdf";

/// Body text and PDF attachments pulled out of one email.
#[derive(Debug, Default)]
pub struct ParsedEmail {
    pub body: String,
    pub pdf_attachments: Vec<DocumentFile>,
}

#[derive(Default)]
struct Collected {
    plain: Vec<String>,
    html: Vec<String>,
    pdfs: Vec<DocumentFile>,
}

/// Parse raw message bytes.
///
/// Charsets and transfer encodings are decoded. text/plain parts form the
/// body; text/html is used only when there is no plain part. Forwarded
/// messages attached as message/rfc822 are walked as well.
pub fn parse_email(raw: &[u8]) -> ParsedEmail {
    let Some(message) = MessageParser::default().parse(raw) else {
        warn!(bytes = raw.len(), "Unparseable email, using raw text");
        return ParsedEmail {
            body: String::from_utf8_lossy(raw).into_owned(),
            pdf_attachments: Vec::new(),
        };
    };

    let mut collected = Collected::default();
    walk(&message, 0, &mut collected);

    let body_parts = if collected.plain.is_empty() {
        collected.html
    } else {
        collected.plain
    };

    debug!(
        body_parts = body_parts.len(),
        pdf_attachments = collected.pdfs.len(),
        "Parsed email"
    );

    ParsedEmail {
        body: body_parts.join("\n"),
        pdf_attachments: collected.pdfs,
    }
}

fn walk(message: &Message<'_>, depth: usize, out: &mut Collected) {
    if depth > MAX_DEPTH {
        return;
    }

    for part in &message.parts {
        let is_attachment = part
            .content_disposition()
            .is_some_and(|d| d.is_attachment());

        match &part.body {
            PartType::Multipart(_) => {}
            PartType::Message(nested) => walk(nested, depth + 1, out),
            PartType::Text(text) if !is_attachment => out.plain.push(text.to_string()),
            PartType::Html(html) if !is_attachment => out.html.push(html.to_string()),
            _ if is_pdf(part, is_attachment) => {
                let bytes = part.contents();
                if !bytes.is_empty() {
                    let filename = part.attachment_name().unwrap_or(DEFAULT_PDF_NAME);
                    out.pdfs
                        .push(DocumentFile::new(filename, "application/pdf", bytes.to_vec()));
                }
            }
            _ => {}
        }
    }
}

/// application/pdf, or an attachment whose name ends in `.pdf`.
fn is_pdf(part: &MessagePart<'_>, is_attachment: bool) -> bool {
    let pdf_type = part.content_type().is_some_and(|ct| {
        ct.ctype().eq_ignore_ascii_case("application")
            && ct.subtype().is_some_and(|s| s.eq_ignore_ascii_case("pdf"))
    });

    pdf_type
        || (is_attachment
            && part
                .attachment_name()
                .is_some_and(|name| name.to_ascii_lowercase().ends_with(".pdf")))
}
