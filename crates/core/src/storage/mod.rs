//! Local storage abstraction.
//!
//! A `StorageSink` persists downloaded bytes under a descriptor's name and
//! answers the fast existence pre-check that lets the scheduler skip files
//! that were already downloaded on an earlier run.

mod fs;
mod traits;

pub use fs::FsStorageSink;
pub use traits::{StorageError, StorageSink};
