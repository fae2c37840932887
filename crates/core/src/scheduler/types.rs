//! Types for the download scheduler.

use serde::{Deserialize, Serialize};

/// Terminal outcome of one descriptor. Every dispatched descriptor produces
/// exactly one of these.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DownloadOutcome {
    /// Transferred in full and handed to the sink (the save itself may still
    /// have failed; see `Settlement::save_failed`).
    Saved,
    /// The storage key already existed; no fetch was issued.
    SkippedExisting,
    /// Every attempt in the retry budget was spent.
    FailedMaxRetries,
}

impl DownloadOutcome {
    /// Label used for the settlement metric.
    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadOutcome::Saved => "saved",
            DownloadOutcome::SkippedExisting => "skipped_existing",
            DownloadOutcome::FailedMaxRetries => "failed_max_retries",
        }
    }
}

/// What a worker reports back to the scheduler, exactly once per dispatch.
#[derive(Debug, Clone)]
pub struct Settlement {
    /// Storage key of the settled descriptor.
    pub name: String,
    /// Terminal outcome.
    pub outcome: DownloadOutcome,
    /// Fetch attempts made (0 when the descriptor was skipped).
    pub attempts: u32,
    /// Whether the transfer succeeded but persisting it did not.
    pub save_failed: bool,
}

/// Totals for a completed run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunReport {
    /// Non-empty pages drained to completion.
    pub pages_drained: u32,
    /// Descriptors transferred and handed to the sink.
    pub saved: u64,
    /// Descriptors skipped because their key already existed.
    pub skipped_existing: u64,
    /// Descriptors abandoned after the retry budget.
    pub failed_max_retries: u64,
    /// Transfers whose save failed; disjoint accounting from `saved`, which
    /// still counts them.
    pub failed_saves: u64,
}

impl RunReport {
    /// Total descriptors that reached a terminal outcome.
    pub fn settled(&self) -> u64 {
        self.saved + self.skipped_existing + self.failed_max_retries
    }
}
