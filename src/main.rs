//! Orpheus crawler main entry point
//!
//! This is the command-line interface for the domain-scoped crawler.

use clap::Parser;
use orpheus_crawler::config::{load_config_with_hash, Config};
use orpheus_crawler::crawler::run_crawl;
use orpheus_crawler::DomainRegistry;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Orpheus: a domain-scoped crawler and extractor
///
/// Orpheus loads a directory of domain documents, crawls every allowed
/// domain breadth-first and writes one record per page for downstream
/// embedding and fine-tuning jobs.
#[derive(Parser, Debug)]
#[command(name = "orpheus-crawler")]
#[command(version = "1.0.0")]
#[command(about = "A domain-scoped crawler and extractor", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Load config and domain documents, print the allow-list and seeds, and exit
    #[arg(long)]
    dry_run: bool,

    /// Directory of domain documents (overrides [domains].directory)
    #[arg(long, value_name = "DIR")]
    domains: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let domains_dir = cli
        .domains
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.domains.directory));

    let registry = load_registry(&domains_dir, &config)?;

    if cli.dry_run {
        handle_dry_run(&config, &registry);
    } else {
        handle_crawl(&config, &registry).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("orpheus_crawler=info,warn"),
            1 => EnvFilter::new("orpheus_crawler=debug,info"),
            2 => EnvFilter::new("orpheus_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the domain registry and refuses to continue when it is empty
fn load_registry(dir: &Path, config: &Config) -> Result<DomainRegistry, Box<dyn std::error::Error>> {
    tracing::info!("Loading domain documents from: {}", dir.display());
    let registry = DomainRegistry::load(dir, &config.domains.shortlink_domain)?;

    if !registry.skipped_documents().is_empty() {
        tracing::warn!(
            "Skipped {} domain documents: {}",
            registry.skipped_documents().len(),
            registry.skipped_documents().join(", ")
        );
    }

    if let Err(e) = registry.ensure_not_empty() {
        tracing::error!("{}", e);
        return Err(e.into());
    }

    tracing::info!(
        "Registry loaded: {} allowed domains, {} seed URLs",
        registry.allowed().len(),
        registry.seeds().len()
    );

    Ok(registry)
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config, registry: &DomainRegistry) {
    println!("=== Orpheus Dry Run ===\n");

    println!("Crawler Configuration:");
    println!(
        "  Max concurrent requests: {}",
        config.crawler.max_concurrent_requests
    );
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Dispatch delay: {}ms", config.crawler.dispatch_delay_ms);
    println!("  Shortlink domain: {}", config.domains.shortlink_domain);

    println!("\nOutput:");
    println!(
        "  Records: {} ({:?})",
        config.output.records_path, config.output.format
    );
    if let Some(path) = &config.output.finetune_path {
        println!("  Fine-tuning dataset: {}", path);
    }
    if let Some(store) = &config.store {
        println!("  Document store: {}", store.database_path);
    }

    println!("\nDomain Documents ({}):", registry.configs().len());
    for document in registry.configs() {
        println!(
            "  - {}: {} subdomain entries",
            document.apex,
            document.subdomains.len()
        );
    }

    println!("\nAllowed Domains ({}):", registry.allowed().len());
    for domain in registry.allowed().iter() {
        println!("  - {}", domain);
    }

    println!("\nSeed URLs ({}):", registry.seeds().len());
    for seed in registry.seeds() {
        println!("  * {}", seed);
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would start crawling with {} seed URLs",
        registry.seeds().len()
    );
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: &Config,
    registry: &DomainRegistry,
) -> Result<(), Box<dyn std::error::Error>> {
    match run_crawl(config, registry).await {
        Ok(stats) => {
            tracing::info!(
                "Crawl completed successfully: {} records in {:.1}s",
                stats.count(orpheus_crawler::PageOutcome::Recorded),
                stats.elapsed.as_secs_f64()
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
