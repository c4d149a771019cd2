//! Database schema definitions
//!
//! This module contains the SQL schema for the document store.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per extracted page, keyed by record id
CREATE TABLE IF NOT EXISTS records (
    id TEXT PRIMARY KEY,
    url TEXT NOT NULL,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    headings TEXT NOT NULL,
    keywords TEXT NOT NULL,
    stored_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_records_url ON records(url);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
