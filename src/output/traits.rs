//! Output sink trait and error types
//!
//! Every persistence target for extracted records implements [`RecordSink`].
//! The coordinator hands each record to every configured sink exactly once
//! and calls `finalize` after the crawl has drained.

use crate::record::CrawlRecord;
use crate::storage::StorageError;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Failed to serialize record: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A persistence target for crawl records
pub trait RecordSink: Send {
    /// Short name used in log messages
    fn name(&self) -> &'static str;

    /// Persists one record
    ///
    /// An error here is logged by the caller and never stops the crawl.
    fn write_record(&mut self, record: &CrawlRecord) -> OutputResult<()>;

    /// Completes the output once no more records will arrive
    fn finalize(&mut self) -> OutputResult<()>;
}
