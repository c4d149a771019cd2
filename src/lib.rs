//! Orpheus crawler: a scoped web crawler and content extractor
//!
//! This crate crawls every page reachable inside an allow-listed set of
//! domains, expands shortlinks, extracts titles, headings, paragraph text and
//! keywords from each page, and writes the results to a record log (and
//! optionally a document store) for downstream indexing.

pub mod config;
pub mod crawler;
pub mod output;
pub mod record;
pub mod registry;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for crawler operations
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTML parse error for {url}: {message}")]
    HtmlParse { url: String, message: String },

    #[error("Domain registry is empty: no domain documents and no seed URLs were loaded")]
    EmptyRegistry,

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to parse domain document {path}: {source}")]
    DomainDocument {
        path: String,
        source: serde_yaml::Error,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid domain: {0}")]
    InvalidDomain(String),
}

/// Result type alias for crawler operations
pub type Result<T> = std::result::Result<T, CrawlerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use record::{CrawlRecord, RecordMetadata};
pub use registry::DomainRegistry;
pub use state::{CrawlPhase, PageOutcome};
pub use self::url::{is_in_scope, registrable_domain, AllowedDomains};
