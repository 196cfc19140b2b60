use std::time::Instant;

use anthropic_client::{AnthropicClient, ContentBlock, Message, MessagesRequest};
use async_trait::async_trait;
use tracing::{debug, info};

use super::backend::DEFAULT_FAST_MODEL;
use crate::error::{ExtractionError, Result};
use crate::mime::parse_email;
use crate::traits::normalizer::DocumentNormalizer;
use crate::types::document::DocumentFile;

const NORMALIZER_PROMPT: &str = "\
You turn travel invoices into compact data extracts.
Output ONLY lines of the form LABEL: value. No prose, headers, markdown,
marketing copy or legal text. One value per line when a field repeats
(several passengers, several segments). Copy every value exactly as printed:
dates, amounts, codes, names.

Fields to look for: vendor or supplier, confirmation number, PNR or record
locator, trip reference, ticket numbers, booking and reservation dates,
passenger names, fare class codes, meal codes, flight numbers, cities and
IATA codes, departure and arrival dates and times, seats, base fare, taxes,
total, commission, currency, tour name and code, start and end dates,
duration, hotel, check-in, check-out, room type, ship and cabin, policy
number, premium, coverage dates, final payment due date, address, phone,
email, date of birth, citizenship.";

const CLOSING: &str = "Extract all invoice data fields from the attached document(s). \
Output only LABEL: value lines. No prose, no headers, no extra text.";

/// Normalizes a bundle with one fast-model call.
///
/// PDFs go to the model as native documents; emails are MIME-parsed so
/// attachment payloads are never sent as text.
#[derive(Debug, Clone)]
pub struct AnthropicNormalizer {
    client: AnthropicClient,
    model: String,
    max_tokens: u32,
}

impl AnthropicNormalizer {
    pub fn new(client: AnthropicClient) -> Self {
        Self {
            client,
            model: DEFAULT_FAST_MODEL.to_string(),
            max_tokens: 2048,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Content blocks for the bundle, closing instruction last.
    pub fn content_blocks(files: &[DocumentFile]) -> Vec<ContentBlock> {
        let mut blocks = Vec::new();

        for file in files {
            if file.is_pdf() {
                let title = if file.filename.is_empty() {
                    "invoice.pdf"
                } else {
                    file.filename.as_str()
                };
                blocks.push(ContentBlock::pdf_base64(file.content_b64(), title));
            } else if file.is_email() {
                let parsed = parse_email(&file.bytes);
                if !parsed.body.trim().is_empty() {
                    blocks.push(ContentBlock::text(parsed.body));
                }
                for pdf in parsed.pdf_attachments {
                    blocks.push(ContentBlock::pdf_base64(pdf.content_b64(), pdf.filename));
                }
            } else {
                blocks.push(ContentBlock::text(file.text_lossy()));
            }
        }

        blocks.push(ContentBlock::text(CLOSING));
        blocks
    }
}

#[async_trait]
impl DocumentNormalizer for AnthropicNormalizer {
    async fn normalize(&self, files: &[DocumentFile]) -> Result<String> {
        if files.is_empty() {
            return Err(ExtractionError::Normalization("no files uploaded".into()));
        }

        let start = Instant::now();
        let blocks = Self::content_blocks(files);
        debug!(files = files.len(), blocks = blocks.len(), "Normalizing bundle");

        let request = MessagesRequest::new(self.model.as_str(), self.max_tokens)
            .system(NORMALIZER_PROMPT)
            .message(Message::user_blocks(blocks));

        let text = self
            .client
            .complete_request(&request)
            .await
            .map_err(|e| ExtractionError::Backend(Box::new(e)))?;

        if text.trim().is_empty() {
            return Err(ExtractionError::Normalization(
                "model returned an empty extract".into(),
            ));
        }

        info!(
            chars = text.len(),
            duration_ms = start.elapsed().as_millis(),
            "Normalized bundle"
        );

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_by_file_kind() {
        let email = "Content-Type: multipart/mixed; boundary=m\n\n\
--m\n\
Content-Type: text/plain\n\n\
Confirmation: ABC123\n\
--m\n\
Content-Type: application/pdf\n\
Content-Disposition: attachment; filename=\"eticket.pdf\"\n\
Content-Transfer-Encoding: base64\n\n\
JVBERi0xLjQK\n\
--m--\n";
        let files = vec![
            DocumentFile::new("", "application/pdf", b"%PDF-1.4".to_vec()),
            DocumentFile::new("fwd.eml", "application/octet-stream", email.as_bytes().to_vec()),
            DocumentFile::new("notes.md", "text/markdown", b"Currency: USD".to_vec()),
        ];

        let blocks = AnthropicNormalizer::content_blocks(&files);

        assert_eq!(blocks.len(), 5);
        assert!(matches!(
            &blocks[0],
            ContentBlock::Document { title: Some(t), .. } if t == "invoice.pdf"
        ));
        assert_eq!(blocks[1], ContentBlock::text("Confirmation: ABC123"));
        assert!(matches!(
            &blocks[2],
            ContentBlock::Document { title: Some(t), source } if t == "eticket.pdf" && source.data == "JVBERi0xLjQK"
        ));
        assert_eq!(blocks[3], ContentBlock::text("Currency: USD"));
        assert_eq!(blocks[4], ContentBlock::text(CLOSING));
    }

    #[tokio::test]
    async fn test_empty_bundle_is_rejected() {
        let normalizer = AnthropicNormalizer::new(AnthropicClient::new("sk-ant-test"));
        let err = normalizer.normalize(&[]).await.unwrap_err();
        assert!(matches!(err, ExtractionError::Normalization(_)));
    }
}
