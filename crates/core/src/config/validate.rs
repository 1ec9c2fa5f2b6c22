use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Catalog API key is set (the TMDB API rejects keyless requests)
/// - Catalog timeout is not 0
/// - Playback tick interval and fallback runtime are not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.catalog.api_key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "catalog.api_key cannot be empty".to_string(),
        ));
    }

    if config.catalog.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "catalog.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.playback.tick_interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "playback.tick_interval_ms cannot be 0".to_string(),
        ));
    }

    if config.playback.fallback_runtime_minutes == 0 {
        return Err(ConfigError::ValidationError(
            "playback.fallback_runtime_minutes cannot be 0".to_string(),
        ));
    }

    Ok(())
}
