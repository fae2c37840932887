pub mod config;
pub mod fetch;
pub mod listing;
pub mod metrics;
pub mod scheduler;
pub mod storage;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, AlbumConfig, Config, ConfigError,
    ImageQuality, ListingConfig, StorageConfig,
};
pub use fetch::{FetchError, FileFetcher, HttpFileFetcher};
pub use listing::{Descriptor, HttpPageSource, ListError, PageCursor, PageSource};
pub use scheduler::{DownloadOutcome, RunReport, Scheduler, SchedulerConfig};
pub use storage::{FsStorageSink, StorageError, StorageSink};
