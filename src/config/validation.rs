use crate::config::types::{Config, CrawlerConfig, HeadersConfig, OutputConfig, SiteConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_crawler_config(&config.crawler)?;
    validate_headers_config(&config.headers)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the site origin and endpoint paths
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let origin = Url::parse(&config.origin)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid origin '{}': {}", config.origin, e)))?;

    if origin.scheme() != "http" && origin.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Origin '{}' must use http or https",
            config.origin
        )));
    }

    validate_path("index-path", &config.index_path)?;
    validate_path("phone-path", &config.phone_path)?;

    Ok(())
}

fn validate_path(name: &str, path: &str) -> Result<(), ConfigError> {
    if !path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "{} must start with '/', got '{}'",
            name, path
        )));
    }
    Ok(())
}

/// Validates crawler limits
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_requests < 1 || config.max_concurrent_requests > 100 {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-requests must be between 1 and 100, got {}",
            config.max_concurrent_requests
        )));
    }

    if config.page_stride < 1 {
        return Err(ConfigError::Validation(
            "page-stride must be >= 1".to_string(),
        ));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.default_pages < 1 {
        return Err(ConfigError::Validation(
            "default-pages must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_headers_config(config: &HeadersConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.csv_path.is_empty() {
        return Err(ConfigError::Validation(
            "csv-path cannot be empty".to_string(),
        ));
    }
    Ok(())
}
