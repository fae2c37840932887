//! Scheduler configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the download scheduler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Maximum downloads in flight at once.
    /// Values above 10 tend to trip remote rate limiting.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Wall-clock budget for a single fetch attempt (milliseconds).
    /// An attempt that does not complete in time is abandoned and retried.
    #[serde(default = "default_attempt_timeout")]
    pub attempt_timeout_ms: u64,

    /// Retries allowed per descriptor after the initial attempt.
    #[serde(default = "default_retry_cap")]
    pub retry_cap: u32,

    /// Records requested per listing page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_max_concurrent() -> usize {
    10
}

fn default_attempt_timeout() -> u64 {
    10_000 // 10 seconds
}

fn default_retry_cap() -> u32 {
    5
}

fn default_page_size() -> u32 {
    20
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
            attempt_timeout_ms: default_attempt_timeout(),
            retry_cap: default_retry_cap(),
            page_size: default_page_size(),
        }
    }
}
