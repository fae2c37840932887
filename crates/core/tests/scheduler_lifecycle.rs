//! Scheduler lifecycle integration tests.
//!
//! These tests verify the download scheduler with mock collaborators:
//! - Terminal outcomes (saved / skipped / failed-after-retries)
//! - The concurrency bound and slot refill on settlement
//! - Page ordering (a page drains fully before the next is requested)
//! - The retry-forever page load policy
//! - Soft save failures and the run-level tally

use std::sync::Arc;
use std::time::Duration;

use magpie_core::testing::{fixtures, MockFileFetcher, MockPageSource, MockStorageSink};
use magpie_core::{RunReport, Scheduler, SchedulerConfig};

/// Test helper bundling the scheduler with its mocks.
struct TestHarness {
    scheduler: Scheduler,
    source: Arc<MockPageSource>,
    fetcher: Arc<MockFileFetcher>,
    sink: Arc<MockStorageSink>,
}

impl TestHarness {
    fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    fn with_config(config: SchedulerConfig) -> Self {
        let source = Arc::new(MockPageSource::new());
        let fetcher = Arc::new(MockFileFetcher::new());
        let sink = Arc::new(MockStorageSink::new());

        let scheduler = Scheduler::new(
            config,
            Arc::clone(&source) as _,
            Arc::clone(&fetcher) as _,
            Arc::clone(&sink) as _,
        );

        Self {
            scheduler,
            source,
            fetcher,
            sink,
        }
    }

    /// Config with a short attempt timeout so hung fetches settle quickly.
    fn fast_config() -> SchedulerConfig {
        SchedulerConfig {
            attempt_timeout_ms: 25,
            ..SchedulerConfig::default()
        }
    }

    async fn run(&self) -> RunReport {
        self.scheduler.run().await
    }
}

// =============================================================================
// Terminal Outcome Scenarios
// =============================================================================

#[tokio::test]
async fn test_single_page_all_saved() {
    let harness = TestHarness::new();
    harness
        .source
        .set_pages(vec![fixtures::page("photo", 3)])
        .await;

    let report = harness.run().await;

    assert_eq!(report.saved, 3);
    assert_eq!(report.skipped_existing, 0);
    assert_eq!(report.failed_max_retries, 0);
    assert_eq!(report.failed_saves, 0);
    assert_eq!(report.pages_drained, 1);

    let mut saved = harness.sink.save_calls().await;
    saved.sort();
    assert_eq!(saved, vec!["photo_1.jpg", "photo_2.jpg", "photo_3.jpg"]);
}

#[tokio::test]
async fn test_existing_file_is_skipped_without_fetch() {
    let harness = TestHarness::new();
    let page = fixtures::page("photo", 2);
    let existing = page[0].clone();
    harness.source.set_pages(vec![page]).await;
    harness.sink.seed_existing(&existing.name).await;

    let report = harness.run().await;

    assert_eq!(report.saved, 1);
    assert_eq!(report.skipped_existing, 1);
    assert_eq!(report.settled(), 2);

    // The existing key must never hit the network.
    assert_eq!(harness.fetcher.fetch_count(&existing.source_url).await, 0);
    assert_eq!(harness.fetcher.total_fetch_count().await, 1);
}

#[tokio::test]
async fn test_timeouts_retry_five_times_then_fail() {
    let harness = TestHarness::with_config(TestHarness::fast_config());
    let page = fixtures::page("photo", 1);
    let doomed = page[0].clone();
    harness.source.set_pages(vec![page]).await;
    harness.fetcher.hang_url(&doomed.source_url).await;

    let report = harness.run().await;

    assert_eq!(report.failed_max_retries, 1);
    assert_eq!(report.saved, 0);
    // 1 initial attempt + exactly 5 retries.
    assert_eq!(harness.fetcher.fetch_count(&doomed.source_url).await, 6);
    assert!(harness.sink.save_calls().await.is_empty());
}

#[tokio::test]
async fn test_empty_first_page_finishes_without_dispatch() {
    let harness = TestHarness::new();

    let report = harness.run().await;

    assert_eq!(report.settled(), 0);
    assert_eq!(report.pages_drained, 0);
    assert_eq!(harness.fetcher.total_fetch_count().await, 0);
    assert_eq!(harness.source.fetch_count().await, 1);
}

#[tokio::test]
async fn test_failed_descriptor_does_not_block_others() {
    let harness = TestHarness::with_config(TestHarness::fast_config());
    let page = fixtures::page("photo", 3);
    let doomed = page[1].clone();
    harness.source.set_pages(vec![page]).await;
    harness.fetcher.hang_url(&doomed.source_url).await;

    let report = harness.run().await;

    assert_eq!(report.saved, 2);
    assert_eq!(report.failed_max_retries, 1);
    assert_eq!(report.pages_drained, 1);
}

// =============================================================================
// Exactly-One-Outcome Accounting
// =============================================================================

#[tokio::test]
async fn test_every_descriptor_settles_exactly_once() {
    let harness = TestHarness::new();
    harness
        .source
        .set_pages(vec![fixtures::page("one", 7), fixtures::page("two", 4)])
        .await;
    harness.sink.seed_existing("one_3.jpg").await;
    harness.sink.seed_existing("two_1.jpg").await;

    let report = harness.run().await;

    assert_eq!(report.settled(), 11);
    assert_eq!(report.saved, 9);
    assert_eq!(report.skipped_existing, 2);
    // One successful save per non-skipped descriptor.
    assert_eq!(harness.sink.save_calls().await.len(), 9);
    assert_eq!(harness.sink.file_count().await, 11);
}

#[tokio::test]
async fn test_save_failures_are_counted_but_not_fatal() {
    let harness = TestHarness::new();
    harness
        .source
        .set_pages(vec![fixtures::page("photo", 3)])
        .await;
    harness.sink.set_fail_saves(true).await;

    let report = harness.run().await;

    // Transfers succeeded, so they settle as saved; the tally records the
    // persistence failures separately.
    assert_eq!(report.saved, 3);
    assert_eq!(report.failed_saves, 3);
    assert_eq!(report.pages_drained, 1);
}

// =============================================================================
// Concurrency Bound
// =============================================================================

#[tokio::test]
async fn test_in_flight_never_exceeds_max_concurrent() {
    let harness = TestHarness::with_config(SchedulerConfig {
        max_concurrent: 3,
        ..SchedulerConfig::default()
    });
    harness
        .source
        .set_pages(vec![fixtures::page("photo", 12)])
        .await;
    // Make fetches slow enough to pile up against the bound.
    harness.fetcher.set_delay(Duration::from_millis(30)).await;

    let report = harness.run().await;

    assert_eq!(report.saved, 12);
    assert!(
        harness.fetcher.peak_in_flight() <= 3,
        "peak in-flight {} exceeded the bound",
        harness.fetcher.peak_in_flight()
    );
}

#[tokio::test]
async fn test_single_slot_serializes_downloads() {
    let harness = TestHarness::with_config(SchedulerConfig {
        max_concurrent: 1,
        ..SchedulerConfig::default()
    });
    harness
        .source
        .set_pages(vec![fixtures::page("photo", 5)])
        .await;
    harness.fetcher.set_delay(Duration::from_millis(5)).await;

    let report = harness.run().await;

    assert_eq!(report.saved, 5);
    assert_eq!(harness.fetcher.peak_in_flight(), 1);
}

// =============================================================================
// Page Ordering
// =============================================================================

#[tokio::test]
async fn test_next_page_requested_only_after_page_drains() {
    let harness = TestHarness::new();
    harness
        .source
        .set_pages(vec![fixtures::page("one", 4), fixtures::page("two", 2)])
        .await;
    harness.fetcher.set_delay(Duration::from_millis(20)).await;

    harness.run().await;

    let fetches = harness.source.recorded_fetches().await;
    // Pages 1, 2 and the empty page 3.
    assert_eq!(fetches.len(), 3);
    assert_eq!(fetches[0].cursor.page_number, 1);
    assert_eq!(fetches[1].cursor.page_number, 2);
    assert_eq!(fetches[2].cursor.page_number, 3);

    // Every page-1 download completed before page 2 was requested.
    let completions = harness.fetcher.completion_instants().await;
    let page2_requested = fetches[1].timestamp;
    let page1_done = completions
        .iter()
        .take(4)
        .max()
        .expect("page 1 had downloads");
    assert!(*page1_done <= page2_requested);
}

// =============================================================================
// Page Load Retry Policy
// =============================================================================

#[tokio::test]
async fn test_page_load_failures_retry_same_page() {
    let harness = TestHarness::new();
    harness
        .source
        .set_pages(vec![fixtures::page("photo", 2)])
        .await;
    harness.source.fail_next(3).await;

    let report = harness.run().await;

    assert_eq!(report.saved, 2);

    let fetches = harness.source.recorded_fetches().await;
    // 3 failures + 1 success for page 1, then the empty page 2.
    assert_eq!(fetches.len(), 5);
    assert!(fetches[..4].iter().all(|f| f.cursor.page_number == 1));
    assert_eq!(fetches[4].cursor.page_number, 2);
}

// =============================================================================
// Multi-Page Runs
// =============================================================================

#[tokio::test]
async fn test_three_pages_drain_in_order() {
    let harness = TestHarness::new();
    harness
        .source
        .set_pages(vec![
            fixtures::page("one", 3),
            fixtures::page("two", 3),
            fixtures::page("three", 1),
        ])
        .await;

    let report = harness.run().await;

    assert_eq!(report.pages_drained, 3);
    assert_eq!(report.saved, 7);
    assert_eq!(harness.source.fetch_count().await, 4);
}

#[tokio::test]
async fn test_page_cursor_carries_configured_page_size() {
    let harness = TestHarness::with_config(SchedulerConfig {
        page_size: 7,
        ..SchedulerConfig::default()
    });

    harness.run().await;

    let fetches = harness.source.recorded_fetches().await;
    assert_eq!(fetches[0].cursor.page_size, 7);
}
