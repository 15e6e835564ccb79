//! SQLite job store implementation
//!
//! This module provides a SQLite-based implementation of the JobStore trait.
//! All operations serialize on an internal connection mutex, which is what
//! makes dequeue's pop-then-load atomic within the process.

use crate::job::{Job, JobStatus};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{JobStore, StorageError, StorageResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

/// SQLite job store backend
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) the job store at the given path
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStore)` - Successfully opened/created database
    /// * `Err(SitelensError)` - Failed to open database
    pub fn open(path: &Path) -> crate::Result<Self> {
        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        // Initialize schema
        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory store (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> crate::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

/// Raw column values for one `jobs` row, before decoding
struct JobRow {
    id: String,
    url: String,
    status: String,
    created_at: String,
    updated_at: String,
    result: Option<String>,
    error: Option<String>,
}

impl JobRow {
    fn from_row(row: &rusqlite::Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get(0)?,
            url: row.get(1)?,
            status: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
            result: row.get(5)?,
            error: row.get(6)?,
        })
    }

    fn into_job(self) -> StorageResult<Job> {
        let status =
            JobStatus::from_db_string(&self.status).ok_or_else(|| StorageError::CorruptRecord {
                id: self.id.clone(),
                reason: format!("unknown status '{}'", self.status),
            })?;
        let created_at = parse_timestamp(&self.id, &self.created_at)?;
        let updated_at = parse_timestamp(&self.id, &self.updated_at)?;

        Ok(Job {
            id: self.id,
            url: self.url,
            status,
            created_at,
            updated_at,
            result: self.result,
            error: self.error,
        })
    }
}

fn parse_timestamp(id: &str, value: &str) -> StorageResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::CorruptRecord {
            id: id.to_string(),
            reason: format!("bad timestamp '{}': {}", value, e),
        })
}

const SELECT_JOB: &str =
    "SELECT id, url, status, created_at, updated_at, result, error FROM jobs";

fn fetch_job(conn: &Connection, id: &str) -> StorageResult<Job> {
    let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", SELECT_JOB))?;
    let raw = stmt
        .query_row(params![id], JobRow::from_row)
        .optional()?;

    match raw {
        Some(raw) => raw.into_job(),
        None => Err(StorageError::JobNotFound(id.to_string())),
    }
}

fn write_job(conn: &Connection, job: &Job) -> StorageResult<()> {
    conn.execute(
        "INSERT OR REPLACE INTO jobs (id, url, status, created_at, updated_at, result, error)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            job.id,
            job.url,
            job.status.to_db_string(),
            job.created_at.to_rfc3339(),
            job.updated_at.to_rfc3339(),
            job.result,
            job.error
        ],
    )?;
    Ok(())
}

impl JobStore for SqliteStore {
    fn put(&self, job: &Job) -> StorageResult<()> {
        let conn = self.conn.lock().unwrap();

        // Two distinct writes, no transaction: record first, then the queue
        // entry. A failure between them orphans a pending record.
        write_job(&conn, job)?;
        conn.execute(
            "INSERT INTO pending_queue (job_id) VALUES (?1)",
            params![job.id],
        )?;
        Ok(())
    }

    fn get(&self, id: &str) -> StorageResult<Job> {
        let conn = self.conn.lock().unwrap();
        fetch_job(&conn, id)
    }

    fn get_all(&self) -> StorageResult<Vec<Job>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!("{} ORDER BY created_at", SELECT_JOB))?;
        let rows = stmt.query_map([], JobRow::from_row)?;

        let mut jobs = Vec::new();
        for row in rows {
            // Undecodable rows are skipped; the snapshot is best-effort.
            if let Ok(job) = row.map_err(StorageError::from).and_then(JobRow::into_job) {
                jobs.push(job);
            }
        }

        Ok(jobs)
    }

    fn update(&self, job: &Job) -> StorageResult<()> {
        let conn = self.conn.lock().unwrap();

        // Read-modify-write: only the lifecycle fields come from the caller.
        let stored = fetch_job(&conn, &job.id)?;
        let merged = Job {
            id: stored.id,
            url: stored.url,
            status: job.status,
            created_at: stored.created_at,
            updated_at: job.updated_at,
            result: job.result.clone(),
            error: job.error.clone(),
        };
        write_job(&conn, &merged)
    }

    fn dequeue(&self) -> StorageResult<Option<Job>> {
        let conn = self.conn.lock().unwrap();

        let front: Option<(i64, String)> = conn
            .query_row(
                "SELECT position, job_id FROM pending_queue ORDER BY position ASC LIMIT 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let (position, id) = match front {
            Some(entry) => entry,
            None => return Ok(None),
        };

        conn.execute(
            "DELETE FROM pending_queue WHERE position = ?1",
            params![position],
        )?;

        fetch_job(&conn, &id).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn job_with_id(id: &str, offset_secs: i64) -> Job {
        let base = Utc::now() + Duration::seconds(offset_secs);
        Job {
            id: id.to_string(),
            url: format!("https://example.com/{}", id),
            status: JobStatus::Pending,
            created_at: base,
            updated_at: base,
            result: None,
            error: None,
        }
    }

    #[test]
    fn test_create_in_memory() {
        let store = SqliteStore::open_in_memory();
        assert!(store.is_ok());
    }

    #[test]
    fn test_put_get_roundtrip() {
        let store = SqliteStore::open_in_memory().unwrap();
        let job = Job::new_pending("https://example.com");

        store.put(&job).unwrap();
        let fetched = store.get(&job.id).unwrap();

        assert_eq!(fetched, job);
    }

    #[test]
    fn test_roundtrip_preserves_terminal_fields() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut job = Job::new_pending("https://example.com");
        job.complete("{\"title\":\"t\"}".to_string());

        store.put(&job).unwrap();
        let fetched = store.get(&job.id).unwrap();

        assert_eq!(fetched, job);
        assert_eq!(fetched.result.as_deref(), Some("{\"title\":\"t\"}"));
    }

    #[test]
    fn test_get_missing_job() {
        let store = SqliteStore::open_in_memory().unwrap();
        let err = store.get("nope").unwrap_err();
        assert!(matches!(err, StorageError::JobNotFound(_)));
    }

    #[test]
    fn test_put_overwrites_record() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut job = job_with_id("A", 0);

        store.put(&job).unwrap();
        job.url = "https://example.com/other".to_string();
        store.put(&job).unwrap();

        let fetched = store.get("A").unwrap();
        assert_eq!(fetched.url, "https://example.com/other");
    }

    #[test]
    fn test_dequeue_fifo_order() {
        let store = SqliteStore::open_in_memory().unwrap();
        for id in ["A", "B", "C"] {
            store.put(&job_with_id(id, 0)).unwrap();
        }

        assert_eq!(store.dequeue().unwrap().unwrap().id, "A");
        assert_eq!(store.dequeue().unwrap().unwrap().id, "B");
        assert_eq!(store.dequeue().unwrap().unwrap().id, "C");

        // Empty queue is "no item", never an error
        assert!(store.dequeue().unwrap().is_none());
    }

    #[test]
    fn test_dequeue_empty_queue() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.dequeue().unwrap().is_none());
    }

    #[test]
    fn test_dequeue_leaves_record_in_place() {
        let store = SqliteStore::open_in_memory().unwrap();
        let job = Job::new_pending("https://example.com");
        store.put(&job).unwrap();

        let dequeued = store.dequeue().unwrap().unwrap();
        assert_eq!(dequeued.id, job.id);

        // Record persists after leaving the queue
        assert_eq!(store.get(&job.id).unwrap().id, job.id);
        assert!(store.dequeue().unwrap().is_none());
    }

    #[test]
    fn test_overwrite_reenqueues_id() {
        let store = SqliteStore::open_in_memory().unwrap();
        let job = job_with_id("A", 0);

        store.put(&job).unwrap();
        store.put(&job).unwrap();

        assert_eq!(store.dequeue().unwrap().unwrap().id, "A");
        assert_eq!(store.dequeue().unwrap().unwrap().id, "A");
        assert!(store.dequeue().unwrap().is_none());
    }

    #[test]
    fn test_dequeue_missing_record_errors_and_consumes_entry() {
        let store = SqliteStore::open_in_memory().unwrap();
        {
            let conn = store.conn.lock().unwrap();
            conn.execute(
                "INSERT INTO pending_queue (job_id) VALUES ('orphan')",
                [],
            )
            .unwrap();
        }

        let err = store.dequeue().unwrap_err();
        assert!(matches!(err, StorageError::JobNotFound(_)));

        // The popped entry is gone; the orphaned id is lost
        assert!(store.dequeue().unwrap().is_none());
    }

    #[test]
    fn test_update_overlays_lifecycle_fields_only() {
        let store = SqliteStore::open_in_memory().unwrap();
        let job = job_with_id("A", 0);
        store.put(&job).unwrap();

        let mut changed = job.clone();
        changed.url = "https://evil.example".to_string();
        changed.created_at = job.created_at + Duration::seconds(60);
        changed.complete("ok".to_string());

        store.update(&changed).unwrap();
        let fetched = store.get("A").unwrap();

        assert_eq!(fetched.status, JobStatus::Completed);
        assert_eq!(fetched.result.as_deref(), Some("ok"));
        assert_eq!(fetched.updated_at, changed.updated_at);
        // Identity fields come from the stored record, not the caller
        assert_eq!(fetched.url, job.url);
        assert_eq!(fetched.created_at, job.created_at);
    }

    #[test]
    fn test_update_missing_job() {
        let store = SqliteStore::open_in_memory().unwrap();
        let job = job_with_id("ghost", 0);
        let err = store.update(&job).unwrap_err();
        assert!(matches!(err, StorageError::JobNotFound(_)));
    }

    #[test]
    fn test_update_records_failure() {
        let store = SqliteStore::open_in_memory().unwrap();
        let job = job_with_id("A", 0);
        store.put(&job).unwrap();

        let mut failed = job.clone();
        failed.fail("connection refused".to_string());
        store.update(&failed).unwrap();

        let fetched = store.get("A").unwrap();
        assert_eq!(fetched.status, JobStatus::Failed);
        assert_eq!(fetched.error.as_deref(), Some("connection refused"));
        assert!(fetched.result.is_none());
    }

    #[test]
    fn test_get_all_in_creation_order() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.put(&job_with_id("newer", 10)).unwrap();
        store.put(&job_with_id("older", -10)).unwrap();

        let jobs = store.get_all().unwrap();
        let ids: Vec<&str> = jobs.iter().map(|j| j.id.as_str()).collect();
        assert_eq!(ids, vec!["older", "newer"]);
    }

    #[test]
    fn test_get_all_skips_undecodable_rows() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.put(&job_with_id("good", 0)).unwrap();

        {
            let conn = store.conn.lock().unwrap();
            conn.execute(
                "INSERT INTO jobs (id, url, status, created_at, updated_at)
                 VALUES ('bad', 'https://example.com', 'exploded', '2024-01-01T00:00:00+00:00', '2024-01-01T00:00:00+00:00')",
                [],
            )
            .unwrap();
        }

        let jobs = store.get_all().unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].id, "good");
    }

    #[test]
    fn test_get_corrupt_record_errors() {
        let store = SqliteStore::open_in_memory().unwrap();
        {
            let conn = store.conn.lock().unwrap();
            conn.execute(
                "INSERT INTO jobs (id, url, status, created_at, updated_at)
                 VALUES ('bad', 'https://example.com', 'pending', 'not-a-time', 'not-a-time')",
                [],
            )
            .unwrap();
        }

        let err = store.get("bad").unwrap_err();
        assert!(matches!(err, StorageError::CorruptRecord { .. }));
    }
}
