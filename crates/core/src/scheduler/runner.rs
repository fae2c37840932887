//! Download scheduler implementation.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::fetch::FileFetcher;
use crate::listing::{Descriptor, PageCursor, PageSource};
use crate::metrics::{DOWNLOADS_SETTLED, PAGES_LOADED, PAGE_RETRIES};
use crate::storage::StorageSink;

use super::config::SchedulerConfig;
use super::types::{DownloadOutcome, RunReport, Settlement};
use super::worker::{settle_descriptor, WorkerContext};

/// The download scheduler - walks the listing page by page and drains each
/// page through a bounded pool of download workers.
pub struct Scheduler {
    config: SchedulerConfig,
    source: Arc<dyn PageSource>,
    fetcher: Arc<dyn FileFetcher>,
    sink: Arc<dyn StorageSink>,
}

/// Dispatch state for the page currently being drained.
///
/// `next_index` only grows within a page; `in_flight` stays within
/// `[0, max_concurrent]`. Both live on the scheduler task, so settlements
/// mutate them without locking.
struct PageState {
    descriptors: Vec<Descriptor>,
    next_index: usize,
    in_flight: usize,
}

impl PageState {
    fn new(descriptors: Vec<Descriptor>) -> Self {
        Self {
            descriptors,
            next_index: 0,
            in_flight: 0,
        }
    }

    fn has_pending(&self) -> bool {
        self.next_index < self.descriptors.len()
    }
}

impl Scheduler {
    /// Create a new scheduler over the given collaborators.
    pub fn new(
        config: SchedulerConfig,
        source: Arc<dyn PageSource>,
        fetcher: Arc<dyn FileFetcher>,
        sink: Arc<dyn StorageSink>,
    ) -> Self {
        Self {
            config,
            source,
            fetcher,
            sink,
        }
    }

    /// Run to completion and report totals.
    ///
    /// Nothing inside a run is fatal: page loads retry forever, descriptor
    /// failures are bounded per descriptor, and save failures only count.
    pub async fn run(&self) -> RunReport {
        let mut report = RunReport::default();
        let mut cursor = PageCursor::first(self.config.page_size);

        loop {
            let descriptors = self.load_page(&cursor).await;
            if descriptors.is_empty() {
                info!(page = cursor.page_number, "Listing exhausted");
                break;
            }

            self.drain_page(descriptors, &mut report).await;
            report.pages_drained += 1;
            cursor.advance();
        }

        info!(
            pages = report.pages_drained,
            saved = report.saved,
            skipped = report.skipped_existing,
            failed = report.failed_max_retries,
            failed_saves = report.failed_saves,
            "Run finished"
        );

        report
    }

    /// Load one page, retrying the same page until it loads.
    ///
    /// Deliberately uncapped and without backoff: a long-lived batch job
    /// under operator supervision prefers eventual success over giving up.
    /// The retry counter makes a stuck page visible from outside.
    async fn load_page(&self, cursor: &PageCursor) -> Vec<Descriptor> {
        loop {
            match self.source.fetch_page(cursor).await {
                Ok(descriptors) => {
                    PAGES_LOADED.inc();
                    info!(
                        page = cursor.page_number,
                        count = descriptors.len(),
                        "Page loaded"
                    );
                    return descriptors;
                }
                Err(e) => {
                    PAGE_RETRIES.inc();
                    warn!(page = cursor.page_number, error = %e, "Page load failed, retrying");
                }
            }
        }
    }

    /// Drain one page: fill the pool, then refill one slot per settlement
    /// until every descriptor has settled.
    async fn drain_page(&self, descriptors: Vec<Descriptor>, report: &mut RunReport) {
        let (tx, mut rx) = mpsc::channel::<Settlement>(self.config.max_concurrent);
        let mut page = PageState::new(descriptors);

        while page.in_flight < self.config.max_concurrent && page.has_pending() {
            self.dispatch(&mut page, &tx);
        }

        // The page is settled exactly when nothing is in flight and nothing
        // is pending; checked after every single settlement.
        while page.in_flight > 0 {
            let Some(settlement) = rx.recv().await else {
                // Unreachable while we hold `tx`; bail rather than spin.
                warn!(
                    in_flight = page.in_flight,
                    "Settlement channel closed mid-page"
                );
                break;
            };

            page.in_flight -= 1;
            record_settlement(&settlement, report);

            if page.has_pending() {
                self.dispatch(&mut page, &tx);
            }
        }
    }

    /// Hand the next pending descriptor to a worker, consuming one slot.
    fn dispatch(&self, page: &mut PageState, tx: &mpsc::Sender<Settlement>) {
        let descriptor = page.descriptors[page.next_index].clone();
        page.next_index += 1;
        page.in_flight += 1;

        debug!(
            name = %descriptor.name,
            in_flight = page.in_flight,
            "Dispatching download"
        );

        let ctx = WorkerContext {
            fetcher: Arc::clone(&self.fetcher),
            sink: Arc::clone(&self.sink),
            attempt_timeout: Duration::from_millis(self.config.attempt_timeout_ms),
            retry_cap: self.config.retry_cap,
        };
        let tx = tx.clone();

        tokio::spawn(async move {
            let settlement = settle_descriptor(ctx, descriptor).await;
            // Exactly one notification per dispatch; the receiver outlives
            // the page, so this only fails if the run was torn down.
            let _ = tx.send(settlement).await;
        });
    }
}

/// Fold one settlement into the run totals.
fn record_settlement(settlement: &Settlement, report: &mut RunReport) {
    DOWNLOADS_SETTLED
        .with_label_values(&[settlement.outcome.as_str()])
        .inc();

    match settlement.outcome {
        DownloadOutcome::Saved => report.saved += 1,
        DownloadOutcome::SkippedExisting => report.skipped_existing += 1,
        DownloadOutcome::FailedMaxRetries => report.failed_max_retries += 1,
    }
    if settlement.save_failed {
        report.failed_saves += 1;
    }
}
