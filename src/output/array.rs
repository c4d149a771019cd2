//! Single JSON array record log
//!
//! Records are buffered in memory and the whole array is written once on
//! finalize. The file is replaced atomically, so readers never observe a
//! partially written array.

use crate::output::traits::{OutputError, OutputResult, RecordSink};
use crate::record::CrawlRecord;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Record log in `array` format
pub struct JsonArraySink {
    path: PathBuf,
    records: Vec<CrawlRecord>,
}

impl JsonArraySink {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            records: Vec::new(),
        }
    }

    pub fn buffered(&self) -> usize {
        self.records.len()
    }

    fn write_array(&self) -> OutputResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let temp = NamedTempFile::new_in(&dir)?;
        {
            let mut writer = BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, &self.records)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }

        temp.persist(&self.path)
            .map_err(|e| OutputError::Write(format!("{}: {}", self.path.display(), e.error)))?;
        Ok(())
    }
}

impl RecordSink for JsonArraySink {
    fn name(&self) -> &'static str {
        "record-log"
    }

    fn write_record(&mut self, record: &CrawlRecord) -> OutputResult<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn finalize(&mut self) -> OutputResult<()> {
        self.write_array()?;
        tracing::info!(
            "Wrote {} records to {}",
            self.records.len(),
            self.path.display()
        );
        Ok(())
    }
}
