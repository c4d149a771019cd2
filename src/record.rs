//! Crawl record type handed from the extractor to every sink
//!
//! The serialized shape (`id`, `url`, `title`, `content`,
//! `metadata.headings`, `metadata.keywords`) is consumed by the downstream
//! ingestion job and must stay stable.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title used when a page has no usable `<title>` element
pub const DEFAULT_TITLE: &str = "No Title";

/// One extracted page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlRecord {
    /// Opaque unique identifier (UUID v4)
    pub id: String,

    /// URL the page was fetched from
    pub url: String,

    /// Trimmed `<title>` text, or [`DEFAULT_TITLE`]
    pub title: String,

    /// Paragraph text, one paragraph per line
    pub content: String,

    pub metadata: RecordMetadata,
}

/// Nested metadata block of a [`CrawlRecord`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMetadata {
    /// h1-h3 text in document order
    #[serde(default)]
    pub headings: Vec<String>,

    /// Entries of the `keywords` meta tag
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl CrawlRecord {
    /// Creates a record with a freshly generated id
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        metadata: RecordMetadata,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            url: url.into(),
            title: title.into(),
            content: content.into(),
            metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_has_unique_ids() {
        let a = CrawlRecord::new("https://example.com", "A", "", RecordMetadata::default());
        let b = CrawlRecord::new("https://example.com", "A", "", RecordMetadata::default());
        assert_ne!(a.id, b.id);
        assert!(Uuid::parse_str(&a.id).is_ok());
    }

    #[test]
    fn test_serialized_shape_is_nested() {
        let record = CrawlRecord {
            id: "abc".to_string(),
            url: "https://example.com/".to_string(),
            title: "Home".to_string(),
            content: "one\ntwo".to_string(),
            metadata: RecordMetadata {
                headings: vec!["Welcome".to_string()],
                keywords: vec!["a".to_string(), "b".to_string()],
            },
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], "abc");
        assert_eq!(value["content"], "one\ntwo");
        assert_eq!(value["metadata"]["headings"][0], "Welcome");
        assert_eq!(value["metadata"]["keywords"][1], "b");
        assert!(value.get("headings").is_none());
    }
}
