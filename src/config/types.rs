use serde::Deserialize;

/// Default number of simultaneous in-flight requests
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: u32 = 100;

/// Default per-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Browser-like user agent sent with every page request
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Default shortlink domain whose URLs are expanded before crawling
pub const DEFAULT_SHORTLINK_DOMAIN: &str = "hack.af";

/// Main configuration structure for the crawler
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    pub domains: DomainsConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub store: Option<StoreConfig>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of URL pipelines in flight at once
    #[serde(rename = "max-concurrent-requests", default = "default_max_concurrent")]
    pub max_concurrent_requests: u32,

    /// Timeout applied to every network request (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_timeout")]
    pub request_timeout_secs: u64,

    /// Pause between dispatch rounds (milliseconds)
    #[serde(rename = "dispatch-delay-ms", default)]
    pub dispatch_delay_ms: u64,

    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            dispatch_delay_ms: 0,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Where the per-domain documents live and which domain carries shortlinks
#[derive(Debug, Clone, Deserialize)]
pub struct DomainsConfig {
    /// Directory holding one `<apex>.yaml` document per registered domain
    pub directory: String,

    #[serde(rename = "shortlink-domain", default = "default_shortlink_domain")]
    pub shortlink_domain: String,
}

/// Record log layout on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON object per line, appended as records arrive
    #[default]
    Lines,
    /// A single JSON array written when the crawl finishes
    Array,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the record log
    #[serde(rename = "records-path")]
    pub records_path: String,

    #[serde(default)]
    pub format: OutputFormat,

    /// Optional path for chat fine-tune entries
    #[serde(rename = "finetune-path", default)]
    pub finetune_path: Option<String>,

    /// Subject named in the fine-tune system prompt
    #[serde(rename = "finetune-topic", default = "default_finetune_topic")]
    pub finetune_topic: String,
}

/// Document store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

fn default_max_concurrent() -> u32 {
    DEFAULT_MAX_CONCURRENT_REQUESTS
}

fn default_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_shortlink_domain() -> String {
    DEFAULT_SHORTLINK_DOMAIN.to_string()
}

fn default_finetune_topic() -> String {
    "Hack Club".to_string()
}
