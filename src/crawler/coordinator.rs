//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Seeding the frontier from the domain registry
//! - Dispatching URL pipelines under the concurrency cap
//! - Writing records to every sink and merging discovered links
//! - Reporting statistics once the frontier drains

use crate::config::Config;
use crate::crawler::extractor::{extract_links, extract_record};
use crate::crawler::fetcher::{build_http_client, fetch_page, FetchResult};
use crate::crawler::scheduler::Frontier;
use crate::crawler::shortlink::resolve_shortlink;
use crate::output::{build_sinks, print_statistics, CrawlStatistics, RecordSink};
use crate::record::CrawlRecord;
use crate::registry::DomainRegistry;
use crate::state::{CrawlPhase, PageOutcome};
use crate::url::{is_in_scope, AllowedDomains};
use crate::CrawlerError;
use reqwest::Client;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// Completed pages between progress log lines
const PROGRESS_INTERVAL: u64 = 10;

/// Read-only state shared by every pipeline task
struct PipelineContext {
    client: Client,
    frontier: Arc<Frontier>,
    allowed: Arc<AllowedDomains>,
    shortlink_domain: String,
    shortlink_timeout: Duration,
}

/// What one pipeline hands back to the coordinator
#[derive(Debug)]
struct PageResult {
    url: String,
    outcome: PageOutcome,
    record: Option<CrawlRecord>,
    links: Vec<String>,
}

impl PageResult {
    fn without_record(url: String, outcome: PageOutcome) -> Self {
        Self {
            url,
            outcome,
            record: None,
            links: Vec::new(),
        }
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    context: Arc<PipelineContext>,
    seeds: Vec<String>,
    semaphore: Arc<Semaphore>,
    dispatch_delay: Duration,
    sinks: Vec<Box<dyn RecordSink>>,
    stats: CrawlStatistics,
    phase: CrawlPhase,
}

impl Coordinator {
    /// Creates a coordinator with the sinks named in the configuration
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `registry` - The loaded domain registry
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(CrawlerError)` - An output could not be opened or the HTTP
    ///   client could not be built
    pub fn new(config: &Config, registry: &DomainRegistry) -> Result<Self, CrawlerError> {
        let sinks = build_sinks(config)?;
        Self::with_sinks(config, registry, sinks)
    }

    /// Creates a coordinator that writes to the given sinks
    pub fn with_sinks(
        config: &Config,
        registry: &DomainRegistry,
        sinks: Vec<Box<dyn RecordSink>>,
    ) -> Result<Self, CrawlerError> {
        let client = build_http_client(&config.crawler)?;
        let max_concurrent = config.crawler.max_concurrent_requests as usize;

        let context = PipelineContext {
            client,
            frontier: Arc::new(Frontier::new()),
            allowed: Arc::new(registry.allowed().clone()),
            shortlink_domain: config.domains.shortlink_domain.to_lowercase(),
            shortlink_timeout: Duration::from_secs(config.crawler.request_timeout_secs),
        };

        Ok(Self {
            context: Arc::new(context),
            seeds: registry.seeds().to_vec(),
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            dispatch_delay: Duration::from_millis(config.crawler.dispatch_delay_ms),
            sinks,
            stats: CrawlStatistics::new(),
            phase: CrawlPhase::Seeding,
        })
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn frontier(&self) -> &Frontier {
        &self.context.frontier
    }

    fn transition(&mut self, next: CrawlPhase) {
        if self.phase.can_transition_to(next) {
            tracing::debug!("Crawl phase {} -> {}", self.phase, next);
            self.phase = next;
        } else {
            tracing::warn!("Ignoring invalid phase transition {} -> {}", self.phase, next);
        }
    }

    /// Runs the crawl until the frontier drains
    ///
    /// 1. Seeds the frontier through the link filter
    /// 2. Claims URLs and spawns a pipeline per URL while permits remain
    /// 3. Reaps finished pipelines, writes records and merges links
    /// 4. Finalizes every sink
    ///
    /// Individual page failures are counted and never abort the run.
    pub async fn run(&mut self) -> Result<CrawlStatistics, CrawlerError> {
        if self.phase.is_terminal() {
            tracing::warn!("Crawl already drained, returning previous statistics");
            return Ok(self.stats.clone());
        }

        let start_time = Instant::now();

        let seeded = self
            .context
            .frontier
            .seed(&self.seeds, &self.context.allowed);
        tracing::info!(
            "Seeded frontier with {} of {} seed URLs across {} allowed domains",
            seeded,
            self.seeds.len(),
            self.context.allowed.len()
        );

        if seeded > 0 {
            self.transition(CrawlPhase::Draining);
        }

        let mut tasks: JoinSet<PageResult> = JoinSet::new();
        let mut completed: u64 = 0;

        loop {
            let dispatched = self.dispatch(&mut tasks);

            if tasks.is_empty() {
                break;
            }

            if dispatched > 0 && !self.dispatch_delay.is_zero() {
                tokio::time::sleep(self.dispatch_delay).await;
            }

            match tasks.join_next().await {
                Some(Ok(result)) => self.handle_result(result),
                Some(Err(e)) => {
                    tracing::error!("Pipeline task failed: {}", e);
                    self.stats.record_outcome(PageOutcome::FetchFailed);
                }
                None => break,
            }

            completed += 1;
            if completed % PROGRESS_INTERVAL == 0 {
                let rate = completed as f64 / start_time.elapsed().as_secs_f64();
                tracing::info!(
                    "Progress: {} pages done, {} in flight, {} in frontier, {:.2} pages/sec",
                    completed,
                    tasks.len(),
                    self.context.frontier.pending_len(),
                    rate
                );
            }
        }

        self.transition(CrawlPhase::Drained);
        tracing::info!(
            "Frontier drained after {} pages ({} URLs visited)",
            completed,
            self.context.frontier.visited_len()
        );

        self.finalize_sinks();

        self.stats.elapsed = start_time.elapsed();
        print_statistics(&self.stats);

        Ok(self.stats.clone())
    }

    /// Spawns pipelines while a permit is free and a URL can be claimed
    fn dispatch(&self, tasks: &mut JoinSet<PageResult>) -> usize {
        let mut dispatched = 0;

        loop {
            let Ok(permit) = Arc::clone(&self.semaphore).try_acquire_owned() else {
                break;
            };

            let Some(url) = self.context.frontier.claim_next() else {
                break;
            };

            tracing::debug!("Dispatching {}", url);
            let context = Arc::clone(&self.context);
            tasks.spawn(async move {
                let _permit = permit;
                process_url(&context, url).await
            });
            dispatched += 1;
        }

        dispatched
    }

    fn handle_result(&mut self, result: PageResult) {
        self.stats.record_outcome(result.outcome);

        if let Some(record) = &result.record {
            for sink in self.sinks.iter_mut() {
                if let Err(e) = sink.write_record(record) {
                    tracing::error!(
                        "Failed to write {} to {}: {}",
                        record.url,
                        sink.name(),
                        e
                    );
                    self.stats.sink_errors += 1;
                }
            }
            tracing::info!("Recorded {}", result.url);
        }

        if !result.links.is_empty() {
            let discovered = result.links.len();
            let added = self
                .context
                .frontier
                .merge(result.links, &self.context.allowed);
            tracing::debug!(
                "{}: {} links discovered, {} queued",
                result.url,
                discovered,
                added
            );
            self.stats.links_discovered += discovered as u64;
            self.stats.links_enqueued += added as u64;
        }
    }

    fn finalize_sinks(&mut self) {
        for sink in self.sinks.iter_mut() {
            if let Err(e) = sink.finalize() {
                tracing::error!("Failed to finalize {}: {}", sink.name(), e);
                self.stats.sink_errors += 1;
            }
        }
    }
}

fn is_shortlink(url: &str, shortlink_domain: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
        .is_some_and(|host| host == shortlink_domain)
}

/// Runs one claimed URL through shortlink expansion, fetch and extraction
async fn process_url(context: &PipelineContext, claimed: String) -> PageResult {
    let mut url = claimed;

    if is_shortlink(&url, &context.shortlink_domain) {
        let Some(resolved) =
            resolve_shortlink(&context.client, &url, context.shortlink_timeout).await
        else {
            return PageResult::without_record(url, PageOutcome::ShortlinkUnresolved);
        };

        if resolved != url {
            if !is_in_scope(&resolved, &context.allowed, &HashSet::new()) {
                tracing::warn!("Shortlink {} resolved out of scope to {}", url, resolved);
                return PageResult::without_record(url, PageOutcome::OutOfScope);
            }

            if !context.frontier.claim(&resolved) {
                tracing::debug!("Shortlink {} resolved to visited {}", url, resolved);
                return PageResult::without_record(resolved, PageOutcome::Duplicate);
            }

            tracing::info!("Expanded shortlink {} -> {}", url, resolved);
            url = resolved;
        }
    }

    let (final_url, body) = match fetch_page(&context.client, &url).await {
        FetchResult::Success {
            final_url, body, ..
        } => (final_url, body),
        FetchResult::HttpError { status_code } => {
            tracing::warn!("Error: {} returned status code {}", url, status_code);
            return PageResult::without_record(url, PageOutcome::FetchFailed);
        }
        FetchResult::NetworkError { error } => {
            tracing::warn!("Error fetching {}: {}", url, error);
            return PageResult::without_record(url, PageOutcome::FetchFailed);
        }
    };

    let record = match extract_record(&body, &url) {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!("Failed to extract {}: {}", url, e);
            return PageResult::without_record(url, PageOutcome::ParseFailed);
        }
    };

    let links = match Url::parse(&final_url) {
        Ok(base) => extract_links(&body, &base),
        Err(e) => {
            tracing::debug!("Cannot resolve links against {}: {}", final_url, e);
            Vec::new()
        }
    };

    PageResult {
        url,
        outcome: PageOutcome::Recorded,
        record: Some(record),
        links,
    }
}

/// Runs a complete crawl with the configured sinks
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `registry` - The loaded domain registry
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - Crawl drained
/// * `Err(CrawlerError)` - The registry was empty or setup failed
///
/// # Example
///
/// ```no_run
/// use orpheus_crawler::config::load_config;
/// use orpheus_crawler::crawler::run_crawl;
/// use orpheus_crawler::DomainRegistry;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("orpheus.toml"))?;
/// let registry = DomainRegistry::load(
///     Path::new(&config.domains.directory),
///     &config.domains.shortlink_domain,
/// )?;
/// run_crawl(&config, &registry).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: &Config,
    registry: &DomainRegistry,
) -> Result<CrawlStatistics, CrawlerError> {
    registry.ensure_not_empty()?;
    let mut coordinator = Coordinator::new(config, registry)?;
    coordinator.run().await
}
