//! HTTP listing backend implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::{AlbumConfig, ImageQuality, ListingConfig};

use super::caption::derive_file_name;
use super::types::{Descriptor, ListError, PageCursor, PageSource, RawPhotoRecord};

/// Deadline for a single listing request.
const LIST_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP listing backend.
///
/// The remote service exposes the album as an ordered id index plus a detail
/// endpoint that resolves up to a page of ids at a time. The index is fetched
/// once and cached; pages are client-side slices of it, so the cursor needs
/// no continuation token.
pub struct HttpPageSource {
    client: Client,
    album: AlbumConfig,
    listing: ListingConfig,
    photo_ids: RwLock<Option<Vec<u64>>>,
}

impl HttpPageSource {
    /// Create a new HttpPageSource for one album.
    pub fn new(album: AlbumConfig, listing: ListingConfig) -> Self {
        let client = Client::builder()
            .timeout(LIST_REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            album,
            listing,
            photo_ids: RwLock::new(None),
        }
    }

    fn endpoint(&self) -> &str {
        self.listing.endpoint.trim_end_matches('/')
    }

    /// Build the URL of the id index endpoint.
    fn build_index_url(&self) -> String {
        format!(
            "{}/photos/get_photo_ids?uid={}&album_id=0&type=3",
            self.endpoint(),
            urlencoding::encode(&self.album.user_id),
        )
    }

    /// Build the URL of the detail endpoint for a batch of ids.
    fn build_detail_url(&self, ids: &[u64]) -> String {
        let joined = ids
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "{}/photos/get_multiple?uid={}&ids={}&type=3",
            self.endpoint(),
            urlencoding::encode(&self.album.user_id),
            urlencoding::encode(&joined),
        )
    }

    /// Build the file URL for one record at the configured quality.
    fn build_file_url(record: &RawPhotoRecord, quality: ImageQuality) -> String {
        format!(
            "{}/{}/{}",
            record.pic_host.trim_end_matches('/'),
            quality.path_segment(),
            record.pic_name,
        )
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T, ListError> {
        let response = self
            .client
            .get(url)
            .header("Cookie", &self.album.credential)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ListError::Timeout
                } else if e.is_connect() {
                    ListError::ConnectionFailed(e.to_string())
                } else {
                    ListError::ApiError(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ListError::ApiError(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ListError::ApiError(format!("Failed to parse response: {}", e)))
    }

    /// The slice of the id index covered by the cursor, loading the index on
    /// first use.
    async fn ids_for_page(&self, cursor: &PageCursor) -> Result<Vec<u64>, ListError> {
        {
            let cached = self.photo_ids.read().await;
            if let Some(ids) = cached.as_ref() {
                return Ok(slice_page(ids, cursor));
            }
        }

        let index: IndexResponse = self.get_json(&self.build_index_url()).await?;
        debug!(total = index.data.len(), "Photo id index loaded");

        let page = slice_page(&index.data, cursor);
        *self.photo_ids.write().await = Some(index.data);
        Ok(page)
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_page(&self, cursor: &PageCursor) -> Result<Vec<Descriptor>, ListError> {
        let ids = self.ids_for_page(cursor).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let detail: DetailResponse = self.get_json(&self.build_detail_url(&ids)).await?;

        // Rebuild in requested-id order; the response is keyed by id and the
        // map's own iteration order is meaningless.
        let mut descriptors = Vec::with_capacity(ids.len());
        for id in &ids {
            let record = match detail.data.get(&id.to_string()) {
                Some(Some(record)) => record,
                // Records can come back null; drop them without retry.
                _ => {
                    debug!(photo_id = id, "Dropping absent record");
                    continue;
                }
            };

            let Some(name) = derive_file_name(record) else {
                warn!(photo_id = id, pic_name = %record.pic_name, "Dropping record without file extension");
                continue;
            };

            descriptors.push(Descriptor {
                name,
                source_url: Self::build_file_url(record, self.listing.quality),
            });
        }

        debug!(
            page = cursor.page_number,
            ids = ids.len(),
            descriptors = descriptors.len(),
            "Page resolved"
        );

        Ok(descriptors)
    }
}

/// The cursor's slice of the full id index; empty once past the end.
fn slice_page(ids: &[u64], cursor: &PageCursor) -> Vec<u64> {
    let start = (cursor.page_number as usize - 1) * cursor.page_size as usize;
    if start >= ids.len() {
        return Vec::new();
    }
    let end = (start + cursor.page_size as usize).min(ids.len());
    ids[start..end].to_vec()
}

// Listing API response types
#[derive(Debug, Deserialize)]
struct IndexResponse {
    data: Vec<u64>,
}

#[derive(Debug, Deserialize)]
struct DetailResponse {
    data: HashMap<String, Option<RawPhotoRecord>>,
}
