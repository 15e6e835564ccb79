//! Storage module for persisting jobs
//!
//! This module handles all database operations for the service, including:
//! - SQLite database initialization and schema management
//! - Job record persistence (one addressable record per job id)
//! - The FIFO pending queue of job ids awaiting processing

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{JobStore, StorageError, StorageResult};

use std::path::Path;

/// Initializes or opens a job store database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStore)` - Successfully initialized store
/// * `Err(SitelensError)` - Failed to initialize store
pub fn open_store(path: &Path) -> crate::Result<SqliteStore> {
    SqliteStore::open(path)
}
