//! Job submission and status reads
//!
//! The service sits between the HTTP layer and the store. It validates
//! submitted URLs, persists new pending jobs, and wakes the worker after
//! each enqueue. Reads pass straight through to the store.

use crate::job::Job;
use crate::storage::{JobStore, StorageError};
use crate::worker::QueueSignal;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

/// Errors surfaced to callers of the service
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Submission rejected; the display text is part of the API contract
    #[error("Invalid URL. Must start with http:// or https://")]
    InvalidUrl,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// The ingestion and status-read facade
pub struct JobService {
    store: Arc<dyn JobStore>,
    signal: Arc<QueueSignal>,
}

impl JobService {
    pub fn new(store: Arc<dyn JobStore>, signal: Arc<QueueSignal>) -> Self {
        Self { store, signal }
    }

    /// Validates the URL, persists a new pending job, and wakes the worker
    ///
    /// The URL is stored exactly as submitted; validation runs on a trimmed
    /// copy so surrounding whitespace does not reject an otherwise valid URL.
    pub fn submit(&self, url: &str) -> ServiceResult<Job> {
        if !is_valid_url(url) {
            warn!("rejected submission: {:?}", url);
            return Err(ServiceError::InvalidUrl);
        }

        let job = Job::new_pending(url);
        self.store.put(&job)?;
        self.signal.wake();

        info!("accepted job {} for {}", job.id, job.url);
        Ok(job)
    }

    /// Reads a single job record
    pub fn job(&self, id: &str) -> ServiceResult<Job> {
        Ok(self.store.get(id)?)
    }

    /// Reads a best-effort snapshot of every job record
    pub fn jobs(&self) -> ServiceResult<Vec<Job>> {
        Ok(self.store.get_all()?)
    }
}

/// Submission rule: the trimmed URL must start with `http://` or `https://`
/// and parse as an absolute URL
fn is_valid_url(raw: &str) -> bool {
    let trimmed = raw.trim();
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return false;
    }
    Url::parse(trimmed).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::JobStatus;
    use crate::storage::SqliteStore;

    fn service() -> (JobService, Arc<SqliteStore>, Arc<QueueSignal>) {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let signal = Arc::new(QueueSignal::new());
        let service = JobService::new(store.clone(), signal.clone());
        (service, store, signal)
    }

    #[test]
    fn test_accepts_https_url() {
        assert!(is_valid_url("https://example.com"));
    }

    #[test]
    fn test_accepts_http_url() {
        assert!(is_valid_url("http://example.com"));
    }

    #[test]
    fn test_rejects_schemeless_url() {
        assert!(!is_valid_url("example.com"));
    }

    #[test]
    fn test_rejects_empty_url() {
        assert!(!is_valid_url(""));
    }

    #[test]
    fn test_rejects_other_scheme() {
        assert!(!is_valid_url("ftp://example.com"));
    }

    #[test]
    fn test_accepts_url_with_surrounding_whitespace() {
        assert!(is_valid_url("  https://example.com  "));
    }

    #[test]
    fn test_submit_creates_pending_job() {
        let (service, store, _signal) = service();

        let job = service.submit("https://example.com").unwrap();
        assert!(!job.id.is_empty());
        assert_eq!(job.status, JobStatus::Pending);

        let stored = store.get(&job.id).unwrap();
        assert_eq!(stored, job);
    }

    #[test]
    fn test_submit_enqueues_job() {
        let (service, store, _signal) = service();

        let job = service.submit("https://example.com").unwrap();
        let dequeued = store.dequeue().unwrap().unwrap();
        assert_eq!(dequeued.id, job.id);
    }

    #[test]
    fn test_submit_stores_url_verbatim() {
        let (service, store, _signal) = service();

        let job = service.submit(" https://example.com ").unwrap();
        let stored = store.get(&job.id).unwrap();
        assert_eq!(stored.url, " https://example.com ");
    }

    #[test]
    fn test_submit_assigns_unique_ids() {
        let (service, _store, _signal) = service();

        let first = service.submit("https://example.com").unwrap();
        let second = service.submit("https://example.com").unwrap();
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_rejected_submission_message() {
        let (service, store, _signal) = service();

        let err = service.submit("example.com").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid URL. Must start with http:// or https://"
        );
        assert!(store.dequeue().unwrap().is_none(), "nothing enqueued");
    }

    #[tokio::test]
    async fn test_submit_wakes_worker() {
        let (service, _store, signal) = service();

        service.submit("https://example.com").unwrap();

        tokio::time::timeout(std::time::Duration::from_millis(100), signal.wait())
            .await
            .expect("submit should leave a retained wake");
    }

    #[test]
    fn test_unknown_job_errors() {
        let (service, _store, _signal) = service();

        let err = service.job("missing").unwrap_err();
        assert!(matches!(err, ServiceError::Storage(_)));
    }

    #[test]
    fn test_jobs_returns_all_records() {
        let (service, _store, _signal) = service();

        service.submit("https://a.example").unwrap();
        service.submit("https://b.example").unwrap();

        let jobs = service.jobs().unwrap();
        assert_eq!(jobs.len(), 2);
    }
}
