//! Contract for the external catalog scrape collaborator.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::ScrapedChallenge;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("navigation timed out after {0:?}")]
    Timeout(Duration),
    #[error("expected page structure missing: {0}")]
    MissingStructure(String),
    #[error("network error: {0}")]
    Network(String),
}

#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch a fresh, unordered list of source-of-truth challenge fields.
    ///
    /// Failures are fatal to the calling synchronization; implementations
    /// release any held external resource before the error propagates.
    async fn fetch_challenges(&self) -> Result<Vec<ScrapedChallenge>, ScrapeError>;
}
