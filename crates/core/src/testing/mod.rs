//! Testing utilities and mock implementations for E2E tests.
//!
//! This module provides mock implementations of all external collaborator
//! traits, allowing scheduler lifecycle tests without real infrastructure.
//!
//! # Example
//!
//! ```rust,ignore
//! use magpie_core::testing::{fixtures, MockFileFetcher, MockPageSource, MockStorageSink};
//!
//! let source = MockPageSource::new();
//! source.set_pages(vec![fixtures::page("photo", 3)]).await;
//!
//! let fetcher = MockFileFetcher::new();
//! let sink = MockStorageSink::new();
//!
//! // Hand to a Scheduler, run, then assert on recorded calls...
//! ```

mod mock_file_fetcher;
mod mock_page_source;
mod mock_storage_sink;

pub use mock_file_fetcher::MockFileFetcher;
pub use mock_page_source::{MockPageSource, RecordedPageFetch};
pub use mock_storage_sink::MockStorageSink;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::listing::Descriptor;

    /// Create a test descriptor with a URL derived from its name.
    pub fn descriptor(name: &str) -> Descriptor {
        Descriptor {
            name: name.to_string(),
            source_url: format!("http://img.example.com/large/{}", name),
        }
    }

    /// Create a page of `count` descriptors sharing a name prefix.
    pub fn page(prefix: &str, count: usize) -> Vec<Descriptor> {
        (1..=count)
            .map(|i| descriptor(&format!("{}_{}.jpg", prefix, i)))
            .collect()
    }
}
