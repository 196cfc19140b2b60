//! Classifier trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::routing::RoutingDecision;

/// Decides vendor, rule set and booking types for a document.
///
/// Failure here is fatal to the run.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Hints come from the submission form and may be empty.
    async fn classify(
        &self,
        document: &str,
        vendor_hint: &str,
        booking_type_hint: &str,
    ) -> Result<RoutingDecision>;
}
