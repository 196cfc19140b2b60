//! Document normalizer trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::document::DocumentFile;

/// Turns an uploaded bundle into one compact text document.
///
/// Failure here is fatal to the run.
#[async_trait]
pub trait DocumentNormalizer: Send + Sync {
    async fn normalize(&self, files: &[DocumentFile]) -> Result<String>;
}
