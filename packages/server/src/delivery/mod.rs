//! Report delivery: email first, then the optional callback.

pub mod callback;
pub mod email;
pub mod render;

use std::sync::Arc;

use async_trait::async_trait;
use extraction::{Delivery, DeliveryError, DeliveryResult, RunReport};
use tracing::error;

pub use callback::{CallbackDelivery, CallbackPayload};
pub use email::EmailDelivery;

/// Runs each delivery in order. One failing does not stop the next.
pub struct CompositeDelivery {
    deliveries: Vec<(&'static str, Arc<dyn Delivery>)>,
}

impl CompositeDelivery {
    pub fn new() -> Self {
        Self {
            deliveries: Vec::new(),
        }
    }

    pub fn with(mut self, name: &'static str, delivery: Arc<dyn Delivery>) -> Self {
        self.deliveries.push((name, delivery));
        self
    }
}

impl Default for CompositeDelivery {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Delivery for CompositeDelivery {
    async fn deliver(&self, report: &RunReport) -> DeliveryResult<()> {
        let mut failures: Vec<DeliveryError> = Vec::new();

        for (name, delivery) in &self.deliveries {
            if let Err(e) = delivery.deliver(report).await {
                error!(delivery = *name, error = %e, "Delivery channel failed");
                failures.push(e);
            }
        }

        match failures.len() {
            0 => Ok(()),
            1 => Err(failures.remove(0)),
            _ => Err(DeliveryError::Multiple(
                failures
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use extraction::testing::RecordingDelivery;
    use extraction::RunStatus;
    use uuid::Uuid;

    fn report() -> RunReport {
        RunReport {
            run_id: Uuid::new_v4(),
            status: RunStatus::Success,
            error: None,
            vendor: "Expedia TAAP".to_string(),
            booking_types: vec!["hotel".to_string()],
            sections: vec![],
            traveller_name: "Unknown".to_string(),
            attachments: vec![],
            callback_url: None,
        }
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_next_channel() {
        let email = Arc::new(RecordingDelivery::new().failing());
        let callback = Arc::new(RecordingDelivery::new());
        let composite = CompositeDelivery::new()
            .with("email", email.clone())
            .with("callback", callback.clone());

        let err = composite.deliver(&report()).await.unwrap_err();

        assert!(matches!(err, DeliveryError::Email(_)));
        assert_eq!(email.reports().len(), 1);
        assert_eq!(callback.reports().len(), 1);
    }

    #[tokio::test]
    async fn test_both_failures_are_combined() {
        let composite = CompositeDelivery::new()
            .with("email", Arc::new(RecordingDelivery::new().failing()))
            .with("callback", Arc::new(RecordingDelivery::new().failing()));

        let err = composite.deliver(&report()).await.unwrap_err();

        match err {
            DeliveryError::Multiple(message) => assert_eq!(message.matches("; ").count(), 1),
            other => panic!("expected Multiple, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_composite_succeeds() {
        assert!(CompositeDelivery::default().deliver(&report()).await.is_ok());
    }
}
