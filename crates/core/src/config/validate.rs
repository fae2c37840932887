use super::{types::Config, ConfigError};

/// Validate configuration
///
/// A missing run identifier or credential must abort the process before any
/// network activity, so the runner calls this right after loading. Also
/// rejects degenerate scheduler settings that would stall dispatch.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.album.user_id.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "album.user_id must not be empty".to_string(),
        ));
    }

    if config.album.credential.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "album.credential must not be empty".to_string(),
        ));
    }

    if config.listing.endpoint.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "listing.endpoint must not be empty".to_string(),
        ));
    }

    if config.scheduler.max_concurrent == 0 {
        return Err(ConfigError::ValidationError(
            "scheduler.max_concurrent must be at least 1".to_string(),
        ));
    }

    if config.scheduler.page_size == 0 {
        return Err(ConfigError::ValidationError(
            "scheduler.page_size must be at least 1".to_string(),
        ));
    }

    Ok(())
}
