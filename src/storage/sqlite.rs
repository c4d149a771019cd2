//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.
//! Headings and keywords are stored as JSON arrays.

use crate::record::{CrawlRecord, RecordMetadata};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (or creates) the database and initializes the schema
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

/// Raw row values; JSON columns are decoded outside the rusqlite closure
struct RecordRow {
    id: String,
    url: String,
    title: String,
    content: String,
    headings: String,
    keywords: String,
}

impl RecordRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            url: row.get(1)?,
            title: row.get(2)?,
            content: row.get(3)?,
            headings: row.get(4)?,
            keywords: row.get(5)?,
        })
    }

    fn into_record(self) -> StorageResult<CrawlRecord> {
        Ok(CrawlRecord {
            id: self.id,
            url: self.url,
            title: self.title,
            content: self.content,
            metadata: RecordMetadata {
                headings: serde_json::from_str(&self.headings)?,
                keywords: serde_json::from_str(&self.keywords)?,
            },
        })
    }
}

const SELECT_RECORD: &str = "SELECT id, url, title, content, headings, keywords FROM records";

impl Storage for SqliteStorage {
    fn upsert_record(&mut self, record: &CrawlRecord) -> StorageResult<()> {
        let headings = serde_json::to_string(&record.metadata.headings)?;
        let keywords = serde_json::to_string(&record.metadata.keywords)?;
        let now = Utc::now().to_rfc3339();

        self.conn.execute(
            "INSERT INTO records (id, url, title, content, headings, keywords, stored_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(id) DO UPDATE SET
                url = excluded.url,
                title = excluded.title,
                content = excluded.content,
                headings = excluded.headings,
                keywords = excluded.keywords,
                stored_at = excluded.stored_at",
            params![
                record.id,
                record.url,
                record.title,
                record.content,
                headings,
                keywords,
                now
            ],
        )?;
        Ok(())
    }

    fn get_record(&self, id: &str) -> StorageResult<Option<CrawlRecord>> {
        let row = self
            .conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_RECORD),
                params![id],
                RecordRow::from_row,
            )
            .optional()?;

        row.map(RecordRow::into_record).transpose()
    }

    fn count_records(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
