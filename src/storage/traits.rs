//! Storage traits and error types
//!
//! This module defines the trait interface for the job store and associated
//! error types.

use crate::job::Job;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("job not found: {0}")]
    JobNotFound(String),

    #[error("corrupt job record {id}: {reason}")]
    CorruptRecord { id: String, reason: String },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for job store implementations
///
/// The store holds one addressable record per job id plus an ordered queue of
/// ids awaiting processing. The queue is decoupled from the records: a job
/// can exist without appearing in the queue, and a queue entry is removed on
/// dequeue while its record persists. Implementations must be safe to share
/// between the HTTP handlers and the worker task.
pub trait JobStore: Send + Sync {
    /// Creates or overwrites the record at `job.id` and appends `job.id` to
    /// the tail of the pending queue.
    ///
    /// These are two distinct writes with no enclosing transaction. A failure
    /// between them leaves a `Pending` record that is never dequeued; this
    /// gap is inherited from the original store layout and is not repaired
    /// here.
    fn put(&self, job: &Job) -> StorageResult<()>;

    /// Returns the job record for `id`, or `JobNotFound`.
    ///
    /// A stored record that cannot be decoded is a `CorruptRecord` error.
    fn get(&self, id: &str) -> StorageResult<Job>;

    /// Returns a best-effort snapshot of every stored job, in creation order.
    ///
    /// Records that fail to decode are silently skipped, so the result may be
    /// shorter than the true record count.
    fn get_all(&self) -> StorageResult<Vec<Job>>;

    /// Reads the current record for `job.id`, overlays `status`,
    /// `updated_at`, `result` and `error` from `job`, and persists the merged
    /// record. `id`, `url` and `created_at` always come from the stored
    /// record.
    ///
    /// The read and the write are separate statements; concurrent updates to
    /// the same id race and the last writer wins. The service runs a single
    /// worker, which is the only writer after creation.
    fn update(&self, job: &Job) -> StorageResult<()>;

    /// Removes the oldest id from the pending queue and returns its job
    /// record, or `None` when the queue is empty.
    ///
    /// Errors indicate store failure, including a popped id whose record
    /// cannot be loaded; that id has already left the queue and is not
    /// restored.
    fn dequeue(&self) -> StorageResult<Option<Job>>;
}
