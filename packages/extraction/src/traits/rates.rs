//! Exchange rate source trait.

use async_trait::async_trait;

use crate::error::RateResult;

/// Quotes how many units of `to` one unit of `from` buys.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn quote(&self, from: &str, to: &str) -> RateResult<f64>;
}
