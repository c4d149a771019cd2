//! Newline-delimited JSON record log
//!
//! Each record is serialized to a single line and written immediately, so the
//! file is valid line by line even if the process stops mid-crawl. A write
//! that fails part way is truncated back to the last complete line.

use crate::output::traits::{OutputError, OutputResult, RecordSink};
use crate::record::CrawlRecord;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Appends one JSON document per line to a file
///
/// Values that fail to write are kept in memory and retried once when
/// the sink is finalized.
pub struct JsonLinesWriter<T> {
    path: PathBuf,
    file: File,
    /// File length after the last complete line
    committed: u64,
    /// Set when a failed write could not be truncated away
    torn: bool,
    backlog: Vec<T>,
}

impl<T: Serialize> JsonLinesWriter<T> {
    /// Opens `path` for appending, creating it if needed
    pub fn open(path: &Path) -> OutputResult<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let committed = file.metadata()?.len();
        Ok(Self {
            path: path.to_path_buf(),
            file,
            committed,
            torn: false,
            backlog: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of values waiting for a retry
    pub fn backlog_len(&self) -> usize {
        self.backlog.len()
    }

    fn write_line(&mut self, value: &T) -> OutputResult<()> {
        let mut line = serde_json::to_vec(value)?;
        line.push(b'\n');

        if self.torn {
            self.rewind_to_boundary()?;
        }

        if let Err(e) = self.file.write_all(&line) {
            if let Err(rewind) = self.rewind_to_boundary() {
                tracing::warn!(
                    "Could not truncate partial line in {}: {}",
                    self.path.display(),
                    rewind
                );
            }
            return Err(e.into());
        }

        self.committed += line.len() as u64;
        Ok(())
    }

    /// Drops any bytes written after the last complete line
    fn rewind_to_boundary(&mut self) -> std::io::Result<()> {
        self.torn = true;
        self.file.set_len(self.committed)?;
        self.torn = false;
        Ok(())
    }

    /// Writes one value, keeping it for a later retry on IO failure
    pub fn append(&mut self, value: T) -> OutputResult<()> {
        match self.write_line(&value) {
            Ok(()) => Ok(()),
            Err(OutputError::Serialization(e)) => Err(OutputError::Serialization(e)),
            Err(e) => {
                self.backlog.push(value);
                Err(e)
            }
        }
    }

    /// Retries the backlog once and flushes the file
    pub fn finish(&mut self) -> OutputResult<()> {
        let backlog = std::mem::take(&mut self.backlog);
        let mut failed = 0usize;

        for value in backlog {
            if self.write_line(&value).is_err() {
                failed += 1;
                self.backlog.push(value);
            }
        }

        self.file.flush()?;

        if failed > 0 {
            return Err(OutputError::Write(format!(
                "{} entries could not be written to {}",
                failed,
                self.path.display()
            )));
        }
        Ok(())
    }
}

/// Record log in `lines` format
pub struct JsonLinesSink {
    writer: JsonLinesWriter<CrawlRecord>,
}

impl JsonLinesSink {
    pub fn open(path: &Path) -> OutputResult<Self> {
        Ok(Self {
            writer: JsonLinesWriter::open(path)?,
        })
    }

    pub fn backlog_len(&self) -> usize {
        self.writer.backlog_len()
    }
}

impl RecordSink for JsonLinesSink {
    fn name(&self) -> &'static str {
        "record-log"
    }

    fn write_record(&mut self, record: &CrawlRecord) -> OutputResult<()> {
        self.writer.append(record.clone())
    }

    fn finalize(&mut self) -> OutputResult<()> {
        self.writer.finish()?;
        tracing::info!("Record log written to {}", self.writer.path().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::reader::read_records;
    use crate::record::RecordMetadata;

    #[test]
    fn test_writes_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.jsonl");

        let mut sink = JsonLinesSink::open(&path).unwrap();
        for i in 0..3 {
            let record = CrawlRecord::new(
                format!("https://example.com/{}", i),
                "Title",
                "line one\nline two",
                RecordMetadata::default(),
            );
            sink.write_record(&record).unwrap();
        }
        sink.finalize().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        for line in lines {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert!(value["metadata"]["headings"].is_array());
        }
        assert_eq!(sink.backlog_len(), 0);
    }

    #[test]
    fn test_appends_to_existing_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.jsonl");
        std::fs::write(&path, "{\"existing\":true}\n").unwrap();

        let mut sink = JsonLinesSink::open(&path).unwrap();
        let record = CrawlRecord::new("https://example.com/", "T", "", RecordMetadata::default());
        sink.write_record(&record).unwrap();
        sink.finalize().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.starts_with("{\"existing\":true}"));
    }

    #[test]
    fn test_lines_round_trip_through_reader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.jsonl");

        let originals = vec![
            CrawlRecord::new(
                "https://example.com/a",
                "Caf\u{e9} \"quoted\" title",
                "first line\nsecond line\r\n\ttabbed",
                RecordMetadata {
                    headings: vec![
                        "Na\u{ef}ve heading".to_string(),
                        "\u{65e5}\u{672c}\u{8a9e}".to_string(),
                    ],
                    keywords: vec!["a\"b".to_string(), "back\\slash".to_string()],
                },
            ),
            CrawlRecord::new("https://example.com/b", "No Title", "", RecordMetadata::default()),
        ];

        let mut sink = JsonLinesSink::open(&path).unwrap();
        for record in &originals {
            sink.write_record(record).unwrap();
        }
        sink.finalize().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 2);
        assert_eq!(read_records(&path).unwrap(), originals);
    }

    #[test]
    fn test_partial_line_is_truncated_before_next_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.jsonl");

        let first = CrawlRecord::new("https://example.com/1", "One", "x", RecordMetadata::default());
        let second = CrawlRecord::new("https://example.com/2", "Two", "y", RecordMetadata::default());

        let mut writer = JsonLinesWriter::open(&path).unwrap();
        writer.append(first.clone()).unwrap();
        let boundary = std::fs::metadata(&path).unwrap().len();
        assert_eq!(writer.committed, boundary);

        // Leave half a line behind, as an interrupted write would
        let mut other = OpenOptions::new().append(true).open(&path).unwrap();
        other.write_all(b"{\"id\":\"half").unwrap();
        writer.torn = true;

        writer.append(second.clone()).unwrap();
        writer.finish().unwrap();

        assert!(!writer.torn);
        assert_eq!(writer.committed, std::fs::metadata(&path).unwrap().len());
        assert_eq!(read_records(&path).unwrap(), vec![first, second]);
    }

    #[test]
    fn test_open_in_missing_directory_fails() {
        let result = JsonLinesSink::open(Path::new("/nonexistent/dir/records.jsonl"));
        assert!(matches!(result, Err(OutputError::Io(_))));
    }
}
