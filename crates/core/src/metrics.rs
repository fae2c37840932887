//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Listing (pages loaded, page retries)
//! - Downloads (settlements by outcome, retries, save failures)
//!
//! `magpie_page_retries_total` doubles as the observability hook for the
//! retry-forever page policy: a run stuck reloading the same page is visible
//! here long before an operator reads the logs.

use once_cell::sync::Lazy;
use prometheus::{IntCounter, IntCounterVec, Opts};

/// Pages successfully loaded from the listing service.
pub static PAGES_LOADED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("magpie_pages_loaded_total", "Total pages loaded").unwrap()
});

/// Failed page loads (each one is retried on the same page).
pub static PAGE_RETRIES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "magpie_page_retries_total",
        "Total failed page loads that were retried",
    )
    .unwrap()
});

/// Descriptor settlements by terminal outcome.
pub static DOWNLOADS_SETTLED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "magpie_downloads_settled_total",
            "Total descriptor settlements",
        ),
        &["outcome"], // "saved", "skipped_existing", "failed_max_retries"
    )
    .unwrap()
});

/// Download attempts that timed out or failed and were retried.
pub static DOWNLOAD_RETRIES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "magpie_download_retries_total",
        "Total download attempts retried",
    )
    .unwrap()
});

/// Persistence failures after a successful transfer.
pub static SAVE_FAILURES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "magpie_save_failures_total",
        "Total save failures after successful transfers",
    )
    .unwrap()
});

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(PAGES_LOADED.clone()),
        Box::new(PAGE_RETRIES.clone()),
        Box::new(DOWNLOADS_SETTLED.clone()),
        Box::new(DOWNLOAD_RETRIES.clone()),
        Box::new(SAVE_FAILURES.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_metrics_register() {
        let registry = prometheus::Registry::new();
        for metric in all_metrics() {
            registry.register(metric).unwrap();
        }
    }

    #[test]
    fn test_settled_outcome_labels() {
        DOWNLOADS_SETTLED.with_label_values(&["saved"]).inc();
        assert!(DOWNLOADS_SETTLED.with_label_values(&["saved"]).get() >= 1);
    }
}
