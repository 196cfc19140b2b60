//! Delivery trait.

use async_trait::async_trait;

use crate::error::DeliveryResult;
use crate::types::report::RunReport;

/// Receives the run report. Called exactly once per run, on every path.
#[async_trait]
pub trait Delivery: Send + Sync {
    async fn deliver(&self, report: &RunReport) -> DeliveryResult<()>;
}
