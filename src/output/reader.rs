//! Reading record logs back
//!
//! Accepts both `lines` and `array` formats. A file whose first
//! non-whitespace byte is `[` is treated as an array.

use crate::output::traits::OutputResult;
use crate::record::CrawlRecord;
use std::path::Path;

/// Reads every record from a record log
pub fn read_records(path: &Path) -> OutputResult<Vec<CrawlRecord>> {
    let content = std::fs::read_to_string(path)?;
    parse_records(&content)
}

/// Parses record log content in either format
pub fn parse_records(content: &str) -> OutputResult<Vec<CrawlRecord>> {
    if content.trim_start().starts_with('[') {
        return Ok(serde_json::from_str(content)?);
    }

    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| serde_json::from_str(line).map_err(Into::into))
        .collect()
}
