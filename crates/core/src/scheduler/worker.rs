//! Download worker: one descriptor's path to settlement.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::fetch::FileFetcher;
use crate::listing::Descriptor;
use crate::metrics::{DOWNLOAD_RETRIES, SAVE_FAILURES};
use crate::storage::StorageSink;

use super::types::{DownloadOutcome, Settlement};

/// Everything a worker needs besides the descriptor itself.
pub(crate) struct WorkerContext {
    pub fetcher: Arc<dyn FileFetcher>,
    pub sink: Arc<dyn StorageSink>,
    pub attempt_timeout: Duration,
    pub retry_cap: u32,
}

/// Drive one descriptor to its terminal outcome.
///
/// Attempts are an explicit loop, not re-invocation: the retry counter is
/// bounded by `retry_cap` and a pathological run of timeouts cannot grow the
/// stack. Dropping a timed-out fetch future aborts the underlying request,
/// so a retry never races an earlier transfer for the same file.
pub(crate) async fn settle_descriptor(ctx: WorkerContext, descriptor: Descriptor) -> Settlement {
    if ctx.sink.exists(&descriptor.name).await {
        info!(name = %descriptor.name, "File already exists, skipping");
        return Settlement {
            name: descriptor.name,
            outcome: DownloadOutcome::SkippedExisting,
            attempts: 0,
            save_failed: false,
        };
    }

    debug!(name = %descriptor.name, url = %descriptor.source_url, "Starting download");

    let mut retries = 0u32;
    loop {
        match timeout(ctx.attempt_timeout, ctx.fetcher.fetch(&descriptor.source_url)).await {
            Ok(Ok(bytes)) => {
                let save_failed = match ctx.sink.save(&descriptor.name, &bytes).await {
                    Ok(()) => {
                        info!(name = %descriptor.name, bytes = bytes.len(), "Download complete");
                        false
                    }
                    Err(e) => {
                        SAVE_FAILURES.inc();
                        warn!(name = %descriptor.name, error = %e, "Save failed after transfer");
                        true
                    }
                };
                return Settlement {
                    name: descriptor.name,
                    outcome: DownloadOutcome::Saved,
                    attempts: retries + 1,
                    save_failed,
                };
            }
            Ok(Err(e)) => {
                warn!(name = %descriptor.name, retries, error = %e, "Fetch attempt failed");
            }
            Err(_) => {
                warn!(name = %descriptor.name, retries, "Fetch attempt timed out");
            }
        }

        if retries == ctx.retry_cap {
            warn!(
                name = %descriptor.name,
                attempts = retries + 1,
                "Retry budget exhausted, giving up"
            );
            return Settlement {
                name: descriptor.name,
                outcome: DownloadOutcome::FailedMaxRetries,
                attempts: retries + 1,
                save_failed: false,
            };
        }

        retries += 1;
        DOWNLOAD_RETRIES.inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, MockFileFetcher, MockStorageSink};

    fn ctx(
        fetcher: &Arc<MockFileFetcher>,
        sink: &Arc<MockStorageSink>,
        timeout_ms: u64,
        retry_cap: u32,
    ) -> WorkerContext {
        WorkerContext {
            fetcher: Arc::clone(fetcher) as Arc<dyn FileFetcher>,
            sink: Arc::clone(sink) as Arc<dyn StorageSink>,
            attempt_timeout: Duration::from_millis(timeout_ms),
            retry_cap,
        }
    }

    #[tokio::test]
    async fn test_successful_attempt_saves() {
        let fetcher = Arc::new(MockFileFetcher::new());
        let sink = Arc::new(MockStorageSink::new());
        let descriptor = fixtures::descriptor("a.jpg");

        let settlement =
            settle_descriptor(ctx(&fetcher, &sink, 1_000, 5), descriptor.clone()).await;

        assert_eq!(settlement.outcome, DownloadOutcome::Saved);
        assert_eq!(settlement.attempts, 1);
        assert!(!settlement.save_failed);
        assert_eq!(fetcher.fetch_count(&descriptor.source_url).await, 1);
        assert!(sink.exists("a.jpg").await);
    }

    #[tokio::test]
    async fn test_existing_file_skips_without_fetch() {
        let fetcher = Arc::new(MockFileFetcher::new());
        let sink = Arc::new(MockStorageSink::new());
        sink.seed_existing("a.jpg").await;
        let descriptor = fixtures::descriptor("a.jpg");

        let settlement =
            settle_descriptor(ctx(&fetcher, &sink, 1_000, 5), descriptor.clone()).await;

        assert_eq!(settlement.outcome, DownloadOutcome::SkippedExisting);
        assert_eq!(settlement.attempts, 0);
        assert_eq!(fetcher.fetch_count(&descriptor.source_url).await, 0);
    }

    #[tokio::test]
    async fn test_timeouts_exhaust_retry_budget() {
        let fetcher = Arc::new(MockFileFetcher::new());
        let sink = Arc::new(MockStorageSink::new());
        let descriptor = fixtures::descriptor("slow.jpg");
        fetcher.hang_url(&descriptor.source_url).await;

        let settlement = settle_descriptor(ctx(&fetcher, &sink, 20, 2), descriptor.clone()).await;

        assert_eq!(settlement.outcome, DownloadOutcome::FailedMaxRetries);
        assert_eq!(settlement.attempts, 3); // 1 initial + 2 retries
        assert_eq!(fetcher.fetch_count(&descriptor.source_url).await, 3);
        assert!(!sink.exists("slow.jpg").await);
    }

    #[tokio::test]
    async fn test_fetch_errors_consume_retries_then_succeed() {
        let fetcher = Arc::new(MockFileFetcher::new());
        let sink = Arc::new(MockStorageSink::new());
        let descriptor = fixtures::descriptor("flaky.jpg");
        fetcher.fail_times(&descriptor.source_url, 2).await;

        let settlement =
            settle_descriptor(ctx(&fetcher, &sink, 1_000, 5), descriptor.clone()).await;

        assert_eq!(settlement.outcome, DownloadOutcome::Saved);
        assert_eq!(settlement.attempts, 3);
        assert_eq!(fetcher.fetch_count(&descriptor.source_url).await, 3);
    }

    #[tokio::test]
    async fn test_save_failure_is_soft() {
        let fetcher = Arc::new(MockFileFetcher::new());
        let sink = Arc::new(MockStorageSink::new());
        sink.set_fail_saves(true).await;

        let settlement =
            settle_descriptor(ctx(&fetcher, &sink, 1_000, 5), fixtures::descriptor("a.jpg")).await;

        assert_eq!(settlement.outcome, DownloadOutcome::Saved);
        assert!(settlement.save_failed);
        assert!(!sink.exists("a.jpg").await);
    }
}
