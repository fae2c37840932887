use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use magpie_core::{
    load_config, validate_config, FileFetcher, FsStorageSink, HttpFileFetcher, HttpPageSource,
    PageSource, Scheduler, StorageSink,
};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("MAGPIE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("magpie.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration; a missing album id or credential aborts here,
    // before any request is made.
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Album: {}", config.album.user_id);
    info!("Quality: {:?}", config.listing.quality);
    info!("Max concurrent downloads: {}", config.scheduler.max_concurrent);

    // Create the destination directory before the first save
    let sink: Arc<dyn StorageSink> = Arc::new(
        FsStorageSink::create(&config.storage.root_dir, &config.album.user_id)
            .await
            .context("Failed to create destination directory")?,
    );

    let source: Arc<dyn PageSource> = Arc::new(HttpPageSource::new(
        config.album.clone(),
        config.listing.clone(),
    ));
    let fetcher: Arc<dyn FileFetcher> = Arc::new(HttpFileFetcher::new());

    let scheduler = Scheduler::new(config.scheduler.clone(), source, fetcher, sink);

    info!("Starting download run");
    let report = scheduler.run().await;

    info!(
        "Done: {} saved, {} already present, {} failed after retries, {} save failures across {} pages",
        report.saved,
        report.skipped_existing,
        report.failed_max_retries,
        report.failed_saves,
        report.pages_drained,
    );

    Ok(())
}
