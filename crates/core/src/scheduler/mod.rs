//! Download scheduler for paginated album mirroring.
//!
//! The scheduler drives the whole run:
//! - **Page loading**: one page of descriptors at a time, retried on the same
//!   page until it loads
//! - **Dispatch**: up to `max_concurrent` download workers in source order
//! - **Drain**: every worker settlement frees a slot; the page is settled
//!   when nothing is pending and nothing is in flight

mod config;
mod runner;
mod types;
mod worker;

pub use config::SchedulerConfig;
pub use runner::Scheduler;
pub use types::{DownloadOutcome, RunReport, Settlement};
