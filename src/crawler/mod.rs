//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and shortlink expansion
//! - HTML extraction into records and link harvesting
//! - The shared frontier and visited set
//! - Overall crawl coordination

mod coordinator;
mod extractor;
mod fetcher;
mod scheduler;
mod shortlink;

pub use coordinator::{run_crawl, Coordinator};
pub use extractor::{extract_links, extract_record};
pub use fetcher::{build_http_client, fetch_page, FetchResult, MAX_REDIRECTS};
pub use scheduler::Frontier;
pub use shortlink::resolve_shortlink;
