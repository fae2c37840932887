//! Mock page source for testing.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

use crate::listing::{Descriptor, ListError, PageCursor, PageSource};

/// A recorded page fetch for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedPageFetch {
    /// The cursor that was requested.
    pub cursor: PageCursor,
    /// When the request was made.
    pub timestamp: Instant,
}

/// Mock implementation of the PageSource trait.
///
/// Provides controllable behavior for testing:
/// - Script the descriptor sequence per page
/// - Track page requests (with instants) for ordering assertions
/// - Inject a budget of failures to exercise the retry-forever policy
pub struct MockPageSource {
    /// Scripted pages; index 0 answers page 1. Pages past the end are empty.
    pages: Arc<RwLock<Vec<Vec<Descriptor>>>>,
    /// Recorded page requests.
    fetches: Arc<RwLock<Vec<RecordedPageFetch>>>,
    /// Remaining fetches that should fail before succeeding.
    fail_budget: Arc<RwLock<u32>>,
}

impl Default for MockPageSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPageSource {
    /// Create a new mock source with no pages (immediately exhausted).
    pub fn new() -> Self {
        Self {
            pages: Arc::new(RwLock::new(Vec::new())),
            fetches: Arc::new(RwLock::new(Vec::new())),
            fail_budget: Arc::new(RwLock::new(0)),
        }
    }

    /// Script the pages to serve, in order.
    pub async fn set_pages(&self, pages: Vec<Vec<Descriptor>>) {
        *self.pages.write().await = pages;
    }

    /// Make the next `count` fetches fail before serving anything.
    pub async fn fail_next(&self, count: u32) {
        *self.fail_budget.write().await += count;
    }

    /// Get recorded page requests.
    pub async fn recorded_fetches(&self) -> Vec<RecordedPageFetch> {
        self.fetches.read().await.clone()
    }

    /// Number of page requests made.
    pub async fn fetch_count(&self) -> usize {
        self.fetches.read().await.len()
    }
}

#[async_trait]
impl PageSource for MockPageSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_page(&self, cursor: &PageCursor) -> Result<Vec<Descriptor>, ListError> {
        self.fetches.write().await.push(RecordedPageFetch {
            cursor: cursor.clone(),
            timestamp: Instant::now(),
        });

        {
            let mut budget = self.fail_budget.write().await;
            if *budget > 0 {
                *budget -= 1;
                return Err(ListError::ConnectionFailed("injected failure".to_string()));
            }
        }

        let pages = self.pages.read().await;
        Ok(pages
            .get(cursor.page_number as usize - 1)
            .cloned()
            .unwrap_or_default())
    }
}
