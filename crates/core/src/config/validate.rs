use super::{types::Config, ConfigError};

/// Validate configuration
///
/// Missing required credentials are fatal: the process must not start with
/// a configuration that can only fail at runtime.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.tmdb.api_key.is_empty() {
        return Err(ConfigError::ValidationError(
            "tmdb.api_key is required".to_string(),
        ));
    }

    if !(0.0..=100.0).contains(&config.matching.threshold) {
        return Err(ConfigError::ValidationError(
            "matching.threshold must be between 0 and 100".to_string(),
        ));
    }

    if config.matching.year_tolerance < 0 {
        return Err(ConfigError::ValidationError(
            "matching.year_tolerance cannot be negative".to_string(),
        ));
    }

    if config.requests.max_pending == 0 {
        return Err(ConfigError::ValidationError(
            "requests.max_pending must be at least 1".to_string(),
        ));
    }

    if let Some(ref telegram) = config.telegram {
        if telegram.bot_token.is_empty() {
            return Err(ConfigError::ValidationError(
                "telegram.bot_token cannot be empty when [telegram] is present".to_string(),
            ));
        }
    }

    Ok(())
}
