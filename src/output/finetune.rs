//! Chat-style fine-tuning dataset
//!
//! Each record becomes one conversation: a system prompt built from the topic
//! and the page's first headings, a question about the page title, and the
//! page content as the answer.

use crate::output::jsonl::JsonLinesWriter;
use crate::output::traits::{OutputResult, RecordSink};
use crate::record::CrawlRecord;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Number of headings quoted in the system prompt
const PROMPT_HEADINGS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
        }
    }
}

/// One line of the fine-tuning dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FineTuneEntry {
    pub messages: Vec<ChatMessage>,
}

impl FineTuneEntry {
    pub fn from_record(record: &CrawlRecord, topic: &str) -> Self {
        let headings = record
            .metadata
            .headings
            .iter()
            .take(PROMPT_HEADINGS)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            messages: vec![
                ChatMessage::new(
                    "system",
                    format!(
                        "You are an expert in {} topics related to {}.",
                        topic, headings
                    ),
                ),
                ChatMessage::new("user", format!("Tell me about {}", record.title)),
                ChatMessage::new("assistant", record.content.clone()),
            ],
        }
    }
}

/// Writes a [`FineTuneEntry`] per record as JSON lines
pub struct FineTuneSink {
    writer: JsonLinesWriter<FineTuneEntry>,
    topic: String,
}

impl FineTuneSink {
    pub fn open(path: &Path, topic: impl Into<String>) -> OutputResult<Self> {
        Ok(Self {
            writer: JsonLinesWriter::open(path)?,
            topic: topic.into(),
        })
    }
}

impl RecordSink for FineTuneSink {
    fn name(&self) -> &'static str {
        "finetune"
    }

    fn write_record(&mut self, record: &CrawlRecord) -> OutputResult<()> {
        self.writer
            .append(FineTuneEntry::from_record(record, &self.topic))
    }

    fn finalize(&mut self) -> OutputResult<()> {
        self.writer.finish()?;
        tracing::info!(
            "Fine-tuning dataset written to {}",
            self.writer.path().display()
        );
        Ok(())
    }
}
