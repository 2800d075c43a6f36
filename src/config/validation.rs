use crate::config::types::{DiscoveryConfig, HarvestConfig, ScrapeConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound accepted for `max-workers`
const WORKER_CEILING: usize = 64;

/// Validates the entire configuration
pub fn validate(config: &HarvestConfig) -> Result<(), ConfigError> {
    validate_discovery_config(&config.discovery)?;
    validate_scrape_config(&config.scrape)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates discovery configuration
fn validate_discovery_config(config: &DiscoveryConfig) -> Result<(), ConfigError> {
    for path in &config.default_sitemap_paths {
        if !path.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "default sitemap path must start with '/', got '{}'",
                path
            )));
        }
    }

    if config.max_sitemaps < 1 {
        return Err(ConfigError::Validation(
            "max_sitemaps must be >= 1".to_string(),
        ));
    }

    if config.fallback_link_cap < 1 {
        return Err(ConfigError::Validation(
            "fallback_link_cap must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates scrape configuration
fn validate_scrape_config(config: &ScrapeConfig) -> Result<(), ConfigError> {
    if config.fetch_timeout_ms < 1 {
        return Err(ConfigError::Validation(
            "fetch_timeout_ms must be >= 1".to_string(),
        ));
    }

    if config.max_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "max_attempts must be >= 1, got {}",
            config.max_attempts
        )));
    }

    if config.min_workers < 1 || config.min_workers > config.max_workers {
        return Err(ConfigError::Validation(format!(
            "min_workers must be between 1 and max_workers ({}), got {}",
            config.max_workers, config.min_workers
        )));
    }

    if config.max_workers > WORKER_CEILING {
        return Err(ConfigError::Validation(format!(
            "max_workers must be <= {}, got {}",
            WORKER_CEILING, config.max_workers
        )));
    }

    if config.urls_per_worker < 1 {
        return Err(ConfigError::Validation(
            "urls_per_worker must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Name: non-empty, alphanumeric + hyphens only
    if config.name.is_empty() {
        return Err(ConfigError::Validation(
            "user agent name cannot be empty".to_string(),
        ));
    }

    if !config.name.chars().all(|c| c.is_alphanumeric() || c == '-') {
        return Err(ConfigError::Validation(format!(
            "user agent name must contain only alphanumeric characters and hyphens, got '{}'",
            config.name
        )));
    }

    if let Some(contact) = &config.contact_url {
        Url::parse(contact)
            .map_err(|e| ConfigError::Validation(format!("Invalid contact_url: {}", e)))?;
    }

    Ok(())
}
