//! Uploaded documents.

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// One uploaded file. A run's input is a bundle of these.
#[derive(Clone, PartialEq, Eq)]
pub struct DocumentFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl DocumentFile {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Decode a base64 payload (JSON upload path).
    pub fn from_base64(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        content_b64: &str,
    ) -> Result<Self, base64::DecodeError> {
        let bytes = STANDARD.decode(content_b64.trim())?;
        Ok(Self::new(filename, content_type, bytes))
    }

    pub fn content_b64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    pub fn is_pdf(&self) -> bool {
        self.content_type.to_ascii_lowercase().contains("pdf")
    }

    /// RFC 822 message, by content type or `.eml` extension.
    pub fn is_email(&self) -> bool {
        self.content_type.to_ascii_lowercase().contains("rfc822")
            || self.filename.to_ascii_lowercase().ends_with(".eml")
    }

    /// Lossy UTF-8 view of the bytes.
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

impl fmt::Debug for DocumentFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentFile")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_detection() {
        assert!(DocumentFile::new("a.pdf", "application/pdf", vec![]).is_pdf());
        assert!(DocumentFile::new("mail.EML", "application/octet-stream", vec![]).is_email());
        assert!(DocumentFile::new("fwd", "message/rfc822", vec![]).is_email());
        assert!(!DocumentFile::new("notes.md", "text/markdown", vec![]).is_email());
    }

    #[test]
    fn test_base64_decode() {
        let file = DocumentFile::from_base64("notes.md", "text/markdown", "SGVsbG8=").unwrap();
        assert_eq!(file.text_lossy(), "Hello");
        assert_eq!(file.content_b64(), "SGVsbG8=");

        assert!(DocumentFile::from_base64("x", "y", "not base64!").is_err());
    }

    #[test]
    fn test_debug_omits_bytes() {
        let file = DocumentFile::new("a.pdf", "application/pdf", vec![1, 2, 3]);
        assert_eq!(
            format!("{:?}", file),
            r#"DocumentFile { filename: "a.pdf", content_type: "application/pdf", len: 3 }"#
        );
    }
}
