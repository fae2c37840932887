//! Trait definitions for the fetch module.

use async_trait::async_trait;
use thiserror::Error;

/// Fetches one file body in full.
#[async_trait]
pub trait FileFetcher: Send + Sync {
    /// Returns the name of this fetcher implementation.
    fn name(&self) -> &str;

    /// Fetch the file at `url`, buffering the entire binary body.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Errors that can occur while fetching a file.
///
/// Every variant consumes one retry from the descriptor's budget.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("File connection failed: {0}")]
    ConnectionFailed(String),

    #[error("File request failed: {0}")]
    RequestFailed(String),

    #[error("File endpoint returned HTTP {0}")]
    Status(u16),

    #[error("Failed to read file body: {0}")]
    Body(String),
}
