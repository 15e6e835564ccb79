//! The background worker loop
//!
//! A single consumer repeatedly claims the oldest pending job, runs the
//! analyzer, and persists the outcome. Each cycle drains the queue fully,
//! then blocks on the wakeup signal fired by ingestion; after a drain is
//! interrupted by a store error the wait also times out on a retry interval
//! so queued work is not stranded. Shutdown is checked only between drain
//! cycles, never mid-job.
//!
//! The service assumes exactly one worker instance. Store updates are
//! read-modify-write with last-writer-wins semantics, so a second consumer
//! would race them.

use crate::job::JobStatus;
use crate::storage::{JobStore, StorageResult};
use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Wakes the worker when new work is enqueued
///
/// Wraps a single-permit notifier: a wake fired while the worker is mid-drain
/// is retained and produces at most one extra empty drain.
#[derive(Debug, Default)]
pub struct QueueSignal {
    notify: Notify,
}

impl QueueSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals that the queue may have new work
    pub fn wake(&self) {
        self.notify.notify_one();
    }

    /// Waits until woken
    pub async fn wait(&self) {
        self.notify.notified().await;
    }
}

/// Analyzer seam used by the worker
///
/// Implemented by [`crate::analyzer::Analyzer`] and by scripted doubles in
/// tests. The returned future must be `Send` so the worker can run as a
/// spawned task.
pub trait PageAnalyzer: Send + Sync {
    /// Analyzes the page at `url`, returning the serialized result payload
    fn analyze(&self, url: &str) -> impl Future<Output = anyhow::Result<String>> + Send;
}

impl PageAnalyzer for crate::analyzer::Analyzer {
    async fn analyze(&self, url: &str) -> anyhow::Result<String> {
        Ok(crate::analyzer::Analyzer::analyze(self, url).await?)
    }
}

/// The queue consumer
pub struct Worker<A> {
    store: Arc<dyn JobStore>,
    analyzer: A,
    signal: Arc<QueueSignal>,
    retry_interval: Duration,
}

impl<A: PageAnalyzer> Worker<A> {
    /// Creates a worker over the given store and analyzer
    ///
    /// # Arguments
    ///
    /// * `store` - The shared job store
    /// * `analyzer` - Invoked once per claimed job
    /// * `signal` - Fired by ingestion after each enqueue
    /// * `retry_interval` - Wait bound after a drain-stopping store error
    pub fn new(
        store: Arc<dyn JobStore>,
        analyzer: A,
        signal: Arc<QueueSignal>,
        retry_interval: Duration,
    ) -> Self {
        Self {
            store,
            analyzer,
            signal,
            retry_interval,
        }
    }

    /// Claims and processes the oldest pending job
    ///
    /// Returns `Ok(true)` when a job was claimed (whether or not its outcome
    /// could be persisted), `Ok(false)` when the queue was empty, and an
    /// error only when the claim itself hit a store failure.
    pub async fn process_next(&self) -> StorageResult<bool> {
        let mut job = match self.store.dequeue()? {
            Some(job) => job,
            None => return Ok(false),
        };

        job.status = JobStatus::Processing;
        job.updated_at = Utc::now();
        if let Err(e) = self.store.update(&job) {
            // The job has left the queue; without the Processing mark it is
            // abandoned until something re-enqueues it.
            error!("failed to mark job {} processing: {}", job.id, e);
            return Ok(true);
        }

        match self.analyzer.analyze(&job.url).await {
            Ok(result) => job.complete(result),
            Err(e) => job.fail(e.to_string()),
        }

        match self.store.update(&job) {
            Ok(()) => info!("processed job {} -> {}", job.id, job.status),
            Err(e) => error!("failed to persist outcome for job {}: {}", job.id, e),
        }

        Ok(true)
    }

    /// Runs drain cycles until the shutdown token fires
    ///
    /// An in-flight job always finishes before shutdown is observed.
    pub async fn run(self, shutdown: CancellationToken) {
        info!("worker started");

        loop {
            let mut drain_failed = false;
            loop {
                match self.process_next().await {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(e) => {
                        error!("drain stopped by store error: {}", e);
                        drain_failed = true;
                        break;
                    }
                }
            }

            if shutdown.is_cancelled() {
                break;
            }

            if drain_failed {
                // Jobs may still be queued; retry after the interval even if
                // no new submission fires the signal.
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = self.signal.wait() => {}
                    _ = tokio::time::sleep(self.retry_interval) => {}
                }
            } else {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = self.signal.wait() => {}
                }
            }
        }

        info!("worker stopped");
    }
}
