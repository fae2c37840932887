//! HTTP file fetcher implementation.

use async_trait::async_trait;
use reqwest::Client;

use super::traits::{FetchError, FileFetcher};

/// Plain GET fetcher.
///
/// Deliberately built without a client-level timeout: the download worker
/// wraps each attempt in its own wall-clock timeout and a second deadline
/// here would race it.
pub struct HttpFileFetcher {
    client: Client,
}

impl Default for HttpFileFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFileFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

#[async_trait]
impl FileFetcher for HttpFileFetcher {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_connect() {
                FetchError::ConnectionFailed(e.to_string())
            } else {
                FetchError::RequestFailed(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;

        Ok(bytes.to_vec())
    }
}
