use crate::config::types::{Config, CrawlerConfig, DomainsConfig, OutputConfig, StoreConfig};
use crate::ConfigError;

/// Upper bound on simultaneous requests accepted from configuration
const MAX_CONCURRENT_REQUESTS_LIMIT: u32 = 1000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_domains_config(&config.domains)?;
    validate_output_config(&config.output)?;
    if let Some(store) = &config.store {
        validate_store_config(store)?;
    }
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_requests < 1
        || config.max_concurrent_requests > MAX_CONCURRENT_REQUESTS_LIMIT
    {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-requests must be between 1 and {}, got {}",
            MAX_CONCURRENT_REQUESTS_LIMIT, config.max_concurrent_requests
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request-timeout-secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the domain document settings
fn validate_domains_config(config: &DomainsConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "domains directory cannot be empty".to_string(),
        ));
    }

    validate_domain_string(&config.shortlink_domain)
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.records_path.is_empty() {
        return Err(ConfigError::Validation(
            "records-path cannot be empty".to_string(),
        ));
    }

    if let Some(path) = &config.finetune_path {
        if path.is_empty() {
            return Err(ConfigError::Validation(
                "finetune-path cannot be empty when set".to_string(),
            ));
        }
        if path == &config.records_path {
            return Err(ConfigError::Validation(format!(
                "finetune-path and records-path must differ, both are '{}'",
                path
            )));
        }
    }

    Ok(())
}

fn validate_store_config(config: &StoreConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates a bare domain name such as `example.com`
pub(crate) fn validate_domain_string(domain: &str) -> Result<(), ConfigError> {
    if domain.is_empty() {
        return Err(ConfigError::InvalidDomain(
            "Domain cannot be empty".to_string(),
        ));
    }

    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidDomain(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::InvalidDomain(format!(
            "Domain '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    if domain.contains("..") {
        return Err(ConfigError::InvalidDomain(format!(
            "Domain '{}' cannot contain consecutive dots",
            domain
        )));
    }

    // e.g. example.com, not just "example"
    if !domain.contains('.') {
        return Err(ConfigError::InvalidDomain(format!(
            "Domain '{}' must contain at least one dot (e.g., 'example.com')",
            domain
        )));
    }

    Ok(())
}
