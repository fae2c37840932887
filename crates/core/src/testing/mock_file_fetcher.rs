//! Mock file fetcher for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::fetch::{FetchError, FileFetcher};

/// Mock implementation of the FileFetcher trait.
///
/// Provides controllable behavior for testing:
/// - Per-URL response bodies with a configurable default
/// - Per-URL call counts and completion instants for assertions
/// - Injectable failures, delays, and never-completing fetches
/// - A cancel-safe in-flight gauge with peak tracking, for verifying the
///   scheduler's concurrency bound
pub struct MockFileFetcher {
    /// Body returned for URLs without a scripted response.
    default_body: Arc<RwLock<Vec<u8>>>,
    /// Scripted per-URL responses.
    responses: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    /// Delay applied to every fetch before it completes.
    delay: Arc<RwLock<Option<Duration>>>,
    /// URLs whose fetches never complete (they sleep until abandoned).
    hung: Arc<RwLock<HashSet<String>>>,
    /// Per-URL count of fetches that should fail before succeeding.
    fail_budgets: Arc<RwLock<HashMap<String, u32>>>,
    /// Per-URL fetch call counts (counted at call entry, so abandoned
    /// attempts are included).
    counts: Arc<RwLock<HashMap<String, u32>>>,
    /// Completion instants of fetches that ran to the end.
    completions: Arc<RwLock<Vec<Instant>>>,
    current_in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
}

/// Decrements the in-flight gauge even when the fetch future is dropped by
/// a timeout.
struct InFlightGuard {
    current: Arc<AtomicUsize>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Default for MockFileFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFileFetcher {
    /// Create a new mock fetcher that answers every URL with a small body.
    pub fn new() -> Self {
        Self {
            default_body: Arc::new(RwLock::new(b"image-bytes".to_vec())),
            responses: Arc::new(RwLock::new(HashMap::new())),
            delay: Arc::new(RwLock::new(None)),
            hung: Arc::new(RwLock::new(HashSet::new())),
            fail_budgets: Arc::new(RwLock::new(HashMap::new())),
            counts: Arc::new(RwLock::new(HashMap::new())),
            completions: Arc::new(RwLock::new(Vec::new())),
            current_in_flight: Arc::new(AtomicUsize::new(0)),
            peak_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Set the body returned for URLs without a scripted response.
    pub async fn set_default_body(&self, body: Vec<u8>) {
        *self.default_body.write().await = body;
    }

    /// Script the body for one URL.
    pub async fn set_response(&self, url: &str, body: Vec<u8>) {
        self.responses.write().await.insert(url.to_string(), body);
    }

    /// Delay every fetch by the given duration.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// Make fetches of this URL hang until the caller abandons them.
    pub async fn hang_url(&self, url: &str) {
        self.hung.write().await.insert(url.to_string());
    }

    /// Make the next `count` fetches of this URL fail.
    pub async fn fail_times(&self, url: &str, count: u32) {
        self.fail_budgets
            .write()
            .await
            .insert(url.to_string(), count);
    }

    /// Number of fetch calls made for one URL, abandoned attempts included.
    pub async fn fetch_count(&self, url: &str) -> u32 {
        self.counts.read().await.get(url).copied().unwrap_or(0)
    }

    /// Number of fetch calls made across all URLs.
    pub async fn total_fetch_count(&self) -> u32 {
        self.counts.read().await.values().sum()
    }

    /// Completion instants of fetches that ran to the end.
    pub async fn completion_instants(&self) -> Vec<Instant> {
        self.completions.read().await.clone()
    }

    /// Highest number of fetches that were ever in flight at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FileFetcher for MockFileFetcher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        *self.counts.write().await.entry(url.to_string()).or_insert(0) += 1;

        let in_flight = self.current_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(in_flight, Ordering::SeqCst);
        let _guard = InFlightGuard {
            current: Arc::clone(&self.current_in_flight),
        };

        if self.hung.read().await.contains(url) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        {
            let mut budgets = self.fail_budgets.write().await;
            if let Some(remaining) = budgets.get_mut(url) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(FetchError::ConnectionFailed(
                        "injected failure".to_string(),
                    ));
                }
            }
        }

        let body = {
            let responses = self.responses.read().await;
            match responses.get(url) {
                Some(body) => body.clone(),
                None => self.default_body.read().await.clone(),
            }
        };

        self.completions.write().await.push(Instant::now());
        Ok(body)
    }
}
