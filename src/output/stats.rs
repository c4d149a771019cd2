//! Crawl statistics gathered while the coordinator runs
//!
//! Counts are accumulated in memory and reported once the crawl drains.

use crate::state::PageOutcome;
use std::collections::BTreeMap;
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, Default)]
pub struct CrawlStatistics {
    /// Count of claimed URLs by outcome
    pub pages_by_outcome: BTreeMap<PageOutcome, u64>,

    /// Links harvested from fetched pages
    pub links_discovered: u64,

    /// Harvested links that passed the filter and entered the frontier
    pub links_enqueued: u64,

    /// Sink writes that returned an error
    pub sink_errors: u64,

    /// Wall-clock duration of the crawl
    pub elapsed: Duration,
}

impl CrawlStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_outcome(&mut self, outcome: PageOutcome) {
        *self.pages_by_outcome.entry(outcome).or_insert(0) += 1;
    }

    pub fn count(&self, outcome: PageOutcome) -> u64 {
        self.pages_by_outcome.get(&outcome).copied().unwrap_or(0)
    }

    /// Total number of claimed URLs that finished
    pub fn total_pages(&self) -> u64 {
        self.pages_by_outcome.values().sum()
    }

    pub fn total_errors(&self) -> u64 {
        self.pages_by_outcome
            .iter()
            .filter(|(outcome, _)| outcome.is_error())
            .map(|(_, count)| count)
            .sum()
    }

    /// Percentage of finished pages that produced a record
    pub fn success_rate(&self) -> f64 {
        let total = self.total_pages();
        if total == 0 {
            return 0.0;
        }
        (self.count(PageOutcome::Recorded) as f64 / total as f64) * 100.0
    }
}

/// Logs statistics in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    tracing::info!("=== Crawl Statistics ===");
    tracing::info!(
        "Pages finished: {} in {:.1}s",
        stats.total_pages(),
        stats.elapsed.as_secs_f64()
    );
    tracing::info!(
        "Links discovered: {} ({} enqueued)",
        stats.links_discovered,
        stats.links_enqueued
    );

    for outcome in PageOutcome::ALL {
        let count = stats.count(outcome);
        if count > 0 {
            tracing::info!("  {}: {}", outcome, count);
        }
    }

    if stats.sink_errors > 0 {
        tracing::warn!("Sink write errors: {}", stats.sink_errors);
    }

    tracing::info!(
        "Success Rate: {:.1}% ({} / {} pages recorded)",
        stats.success_rate(),
        stats.count(PageOutcome::Recorded),
        stats.total_pages()
    );
}
