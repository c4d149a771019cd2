//! Output module for persisting extracted records
//!
//! This module handles:
//! - The record log, as JSON lines or a single JSON array
//! - The optional chat-style fine-tuning dataset
//! - The optional SQLite document store
//! - Crawl statistics

mod array;
mod finetune;
mod jsonl;
mod reader;
pub mod stats;
mod store;
mod traits;

pub use array::JsonArraySink;
pub use finetune::{ChatMessage, FineTuneEntry, FineTuneSink};
pub use jsonl::{JsonLinesSink, JsonLinesWriter};
pub use reader::{parse_records, read_records};
pub use stats::{print_statistics, CrawlStatistics};
pub use store::StoreSink;
pub use traits::{OutputError, OutputResult, RecordSink};

use crate::config::{Config, OutputFormat};
use std::path::Path;

/// Builds every sink the configuration asks for
///
/// The record log is always present. The fine-tuning dataset and the
/// document store are added when configured.
///
/// # Returns
///
/// * `Ok(Vec<Box<dyn RecordSink>>)` - The configured sinks
/// * `Err(OutputError)` - An output file could not be opened
pub fn build_sinks(config: &Config) -> OutputResult<Vec<Box<dyn RecordSink>>> {
    let mut sinks: Vec<Box<dyn RecordSink>> = Vec::new();

    let records_path = Path::new(&config.output.records_path);
    match config.output.format {
        OutputFormat::Lines => sinks.push(Box::new(JsonLinesSink::open(records_path)?)),
        OutputFormat::Array => sinks.push(Box::new(JsonArraySink::new(records_path))),
    }

    if let Some(path) = &config.output.finetune_path {
        sinks.push(Box::new(FineTuneSink::open(
            Path::new(path),
            config.output.finetune_topic.clone(),
        )?));
    }

    if let Some(store) = &config.store {
        sinks.push(Box::new(StoreSink::open(Path::new(&store.database_path))));
    }

    Ok(sinks)
}
