//! Configuration module for the crawler
//!
//! This module handles loading, parsing, and validating the TOML configuration
//! file that names the domain document directory, concurrency limits and
//! output targets.
//!
//! # Example
//!
//! ```no_run
//! use orpheus_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("orpheus.toml")).unwrap();
//! println!("Max in-flight requests: {}", config.crawler.max_concurrent_requests);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, DomainsConfig, OutputConfig, OutputFormat, StoreConfig,
    DEFAULT_MAX_CONCURRENT_REQUESTS, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SHORTLINK_DOMAIN,
    DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};

pub(crate) use validation::validate_domain_string;
