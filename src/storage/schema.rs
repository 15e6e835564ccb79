//! Database schema definitions
//!
//! This module contains the SQL schema for the sitelens job store.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One addressable record per job id
CREATE TABLE IF NOT EXISTS jobs (
    id TEXT PRIMARY KEY,
    url TEXT NOT NULL,
    status TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    result TEXT,
    error TEXT
);

CREATE INDEX IF NOT EXISTS idx_jobs_created ON jobs(created_at);

-- Ordered list of job ids awaiting processing. Deliberately not a foreign
-- key: the queue is decoupled from the records, and duplicate ids are
-- allowed (overwriting a record via put re-enqueues its id).
CREATE TABLE IF NOT EXISTS pending_queue (
    position INTEGER PRIMARY KEY AUTOINCREMENT,
    job_id TEXT NOT NULL
);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
