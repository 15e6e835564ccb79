//! Sitelens: an asynchronous URL-analysis job service
//!
//! Clients submit a URL, a background worker fetches the page and computes
//! structural metrics (HTML version, title, heading counts, link
//! classification, login-form detection), and clients poll for the outcome.
//! Jobs move through a small state machine (pending -> processing ->
//! completed | failed) backed by a SQLite store with a FIFO pending queue.

pub mod analyzer;
pub mod config;
pub mod job;
pub mod server;
pub mod service;
pub mod storage;
pub mod worker;

use thiserror::Error;

/// Main error type for sitelens operations
#[derive(Debug, Error)]
pub enum SitelensError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Analysis error: {0}")]
    Analyzer(#[from] analyzer::AnalyzerError),

    #[error("Service error: {0}")]
    Service(#[from] service::ServiceError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for sitelens operations
pub type Result<T> = std::result::Result<T, SitelensError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use analyzer::{Analyzer, PageAnalysis};
pub use config::Config;
pub use job::{Job, JobStatus};
pub use service::JobService;
pub use storage::{JobStore, SqliteStore};
pub use worker::{QueueSignal, Worker};
