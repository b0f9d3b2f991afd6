use crate::config::types::{Config, CrawlConfig, OutputConfig, RenderConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawl_config(&config.crawl)?;
    validate_render_config(&config.render)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawl scope and traversal configuration
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.start_urls.is_empty() {
        return Err(ConfigError::Validation(
            "start-urls cannot be empty".to_string(),
        ));
    }

    for start_url in &config.start_urls {
        crate::url::clean(start_url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid start URL '{}': {}", start_url, e))
        })?;
    }

    if config.allowed_domains.is_empty() {
        return Err(ConfigError::Validation(
            "allowed-domains cannot be empty".to_string(),
        ));
    }

    for domain in &config.allowed_domains {
        if domain.trim().is_empty() {
            return Err(ConfigError::Validation(
                "allowed-domains entries cannot be blank".to_string(),
            ));
        }
    }

    for blocked in &config.blocked_substrings {
        if blocked.trim().is_empty() {
            return Err(ConfigError::Validation(
                "blocked-substrings entries cannot be blank".to_string(),
            ));
        }
    }

    if config.workers < 1 || config.workers > 64 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 64, got {}",
            config.workers
        )));
    }

    Ok(())
}

/// Validates rendering proxy configuration
fn validate_render_config(config: &RenderConfig) -> Result<(), ConfigError> {
    if !config.enabled {
        return Ok(());
    }

    let endpoint = Url::parse(&config.endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid render endpoint: {}", e)))?;

    if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "render endpoint must be http or https, got '{}'",
            endpoint.scheme()
        )));
    }

    if config.wait < 0.0 {
        return Err(ConfigError::Validation(format!(
            "render wait cannot be negative, got {}",
            config.wait
        )));
    }

    if config.timeout < 1 {
        return Err(ConfigError::Validation(
            "render timeout must be >= 1 second".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.mirror_root.is_empty() {
        return Err(ConfigError::Validation(
            "mirror-root cannot be empty".to_string(),
        ));
    }

    Ok(())
}
