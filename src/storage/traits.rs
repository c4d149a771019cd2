//! Storage traits and error types
//!
//! This module defines the trait interface for document store backends and
//! associated error types.

use crate::record::CrawlRecord;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for document store implementations
///
/// Records are keyed by their `id`. Writing the same id twice replaces the
/// stored document.
pub trait Storage {
    /// Inserts a record, or replaces the stored record with the same id
    fn upsert_record(&mut self, record: &CrawlRecord) -> StorageResult<()>;

    /// Gets a record by id
    fn get_record(&self, id: &str) -> StorageResult<Option<CrawlRecord>>;

    /// Counts stored records
    fn count_records(&self) -> StorageResult<u64>;
}
