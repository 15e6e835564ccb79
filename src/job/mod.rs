//! Job records and their lifecycle states
//!
//! A job tracks a single URL-analysis request from submission to a terminal
//! outcome. Records are created in `Pending`, claimed by the worker as
//! `Processing`, and finish as either `Completed` (with a result payload) or
//! `Failed` (with an error message). Terminal records are never mutated again
//! and never deleted.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Represents the current state of a job in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Job has been accepted and is waiting in the pending queue
    Pending,

    /// Job has been claimed by the worker and is being analyzed
    Processing,

    /// Analysis finished; the record carries a result payload
    Completed,

    /// Analysis failed; the record carries an error message
    Failed,
}

impl JobStatus {
    /// Returns true if this is a terminal state (no further transitions occur)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns true if the job may still be processed
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Processing)
    }

    /// Converts the status to its database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Parses a status from its database string representation
    ///
    /// Returns None if the string doesn't match any known status.
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "processing" => Some(Self::Processing),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Returns all possible statuses
    pub fn all_statuses() -> Vec<Self> {
        vec![
            Self::Pending,
            Self::Processing,
            Self::Completed,
            Self::Failed,
        ]
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}

/// A tracked URL-analysis request
///
/// `result` and `error` are mutually exclusive: both are absent while the
/// status is active, and exactly one is present once the status is terminal.
/// Both fields are omitted from the JSON form when absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Job {
    pub id: String,
    pub url: String,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Job {
    /// Creates a new pending job for the given URL with a fresh id
    pub fn new_pending(url: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            url: url.into(),
            status: JobStatus::Pending,
            created_at: now,
            updated_at: now,
            result: None,
            error: None,
        }
    }

    /// Marks the job completed with the given result payload
    pub fn complete(&mut self, result: String) {
        self.status = JobStatus::Completed;
        self.result = Some(result);
        self.error = None;
        self.updated_at = Utc::now();
    }

    /// Marks the job failed with the given error message
    pub fn fail(&mut self, message: String) {
        self.status = JobStatus::Failed;
        self.error = Some(message);
        self.result = None;
        self.updated_at = Utc::now();
    }
}
