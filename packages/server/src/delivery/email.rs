use std::time::Instant;

use async_trait::async_trait;
use chrono::Local;
use extraction::{Delivery, DeliveryError, DeliveryResult, RunReport};
use resend::{Attachment, EmailMessage, ResendService};
use tracing::info;

use super::render;

/// Sends the report as an HTML email with the original files attached.
#[derive(Debug, Clone)]
pub struct EmailDelivery {
    resend: ResendService,
}

impl EmailDelivery {
    pub fn new(resend: ResendService) -> Self {
        Self { resend }
    }

    pub fn message(report: &RunReport) -> EmailMessage {
        EmailMessage {
            subject: render::subject(report),
            html: render::html_body(report, Local::now()),
            attachments: report
                .attachments
                .iter()
                .map(|file| Attachment {
                    filename: file.filename.clone(),
                    content: file.content_b64(),
                })
                .collect(),
        }
    }
}

#[async_trait]
impl Delivery for EmailDelivery {
    async fn deliver(&self, report: &RunReport) -> DeliveryResult<()> {
        let start = Instant::now();
        let message = Self::message(report);

        let response = self
            .resend
            .send_email(&message)
            .await
            .map_err(|e| DeliveryError::Email(Box::new(e)))?;

        info!(
            email_id = %response.id,
            subject = %message.subject,
            attachments = message.attachments.len(),
            duration_ms = start.elapsed().as_millis(),
            "Report emailed"
        );

        Ok(())
    }
}
