//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: the coordinator's seeding / draining / drained lifecycle
//! - `PageOutcome`: how each claimed URL's pipeline ended

mod crawl_phase;
mod page_outcome;

// Re-export main types
pub use crawl_phase::CrawlPhase;
pub use page_outcome::PageOutcome;
