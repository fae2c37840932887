//! Types for the album listing system.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One downloadable unit: a storage key and where to fetch it from.
///
/// Immutable once produced by the listing layer; passed by value into a
/// download worker and discarded when that worker settles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Descriptor {
    /// Filesystem-safe storage key, unique within a page.
    pub name: String,
    /// Fully qualified URL of the file to download.
    pub source_url: String,
}

/// Identifies which slice of the full listing to fetch next.
///
/// Owned exclusively by the scheduler and advanced monotonically; pages are
/// never revisited once drained.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageCursor {
    /// 1-based page index.
    pub page_number: u32,
    /// Number of records per page.
    pub page_size: u32,
}

impl PageCursor {
    /// Cursor for the first page.
    pub fn first(page_size: u32) -> Self {
        Self {
            page_number: 1,
            page_size,
        }
    }

    /// Move to the next page.
    pub fn advance(&mut self) {
        self.page_number += 1;
    }
}

/// A raw photo record as returned by the detail endpoint, before name
/// derivation. Fields not needed for building a `Descriptor` are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPhotoRecord {
    pub photo_id: u64,
    pub pic_name: String,
    pub pic_host: String,
    #[serde(default)]
    pub caption_render: Option<String>,
}

/// Produces the ordered descriptor sequence for one page of the listing.
///
/// An empty sequence signals exhaustion: either the page index ran past the
/// remote total or the source has no items left.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Returns the name of this source implementation.
    fn name(&self) -> &str;

    /// Fetch the descriptors for the given page, in source order.
    async fn fetch_page(&self, cursor: &PageCursor) -> Result<Vec<Descriptor>, ListError>;
}

/// Errors that can occur while loading a page of the listing.
///
/// None of these are fatal to a run: the scheduler retries the same page
/// until it loads.
#[derive(Debug, Error)]
pub enum ListError {
    #[error("Listing service connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Listing request timed out")]
    Timeout,

    #[error("Listing service API error: {0}")]
    ApiError(String),
}
