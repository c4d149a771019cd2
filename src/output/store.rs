//! Document store sink
//!
//! Upserts every record into the SQLite store. When the store cannot be
//! opened the sink stays in place but skips all writes, so the rest of the
//! crawl is unaffected.

use crate::output::traits::{OutputResult, RecordSink};
use crate::record::CrawlRecord;
use crate::storage::{open_storage, Storage};
use std::path::Path;

pub struct StoreSink {
    store: Option<Box<dyn Storage + Send>>,
    written: u64,
}

impl StoreSink {
    /// Opens the store at `path`, falling back to a disabled sink on error
    pub fn open(path: &Path) -> Self {
        match open_storage(path) {
            Ok(storage) => {
                tracing::info!("Document store opened at {}", path.display());
                Self::with_storage(Box::new(storage))
            }
            Err(e) => {
                tracing::warn!(
                    "Document store at {} unavailable, records will not be stored: {}",
                    path.display(),
                    e
                );
                Self::disabled()
            }
        }
    }

    pub fn with_storage(store: Box<dyn Storage + Send>) -> Self {
        Self {
            store: Some(store),
            written: 0,
        }
    }

    pub fn disabled() -> Self {
        Self {
            store: None,
            written: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    pub fn written(&self) -> u64 {
        self.written
    }
}

impl RecordSink for StoreSink {
    fn name(&self) -> &'static str {
        "store"
    }

    fn write_record(&mut self, record: &CrawlRecord) -> OutputResult<()> {
        let Some(store) = self.store.as_mut() else {
            tracing::debug!("Store disabled, skipping {}", record.url);
            return Ok(());
        };

        store.upsert_record(record)?;
        self.written += 1;
        Ok(())
    }

    fn finalize(&mut self) -> OutputResult<()> {
        if let Some(store) = self.store.as_ref() {
            let total = store.count_records()?;
            tracing::info!(
                "Stored {} records this run ({} in store)",
                self.written,
                total
            );
        }
        Ok(())
    }
}
