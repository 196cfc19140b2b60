use serde::{Deserialize, Serialize};

/// An outgoing email.
#[derive(Debug, Clone, Default)]
pub struct EmailMessage {
    pub subject: String,
    pub html: String,
    pub attachments: Vec<Attachment>,
}

/// A file attached to an email. `content` is base64.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct SendEmailBody<'a> {
    pub from: &'a str,
    pub to: &'a [String],
    pub subject: &'a str,
    pub html: &'a str,
    #[serde(skip_serializing_if = "<[Attachment]>::is_empty")]
    pub attachments: &'a [Attachment],
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendEmailResponse {
    pub id: String,
}
