//! Concurrency-safe in-memory job registry.
//!
//! [`JobStore`] owns every tracked [`Job`] behind a single `RwLock` over an
//! insertion-ordered map. Insertion order (oldest first) is what makes the
//! bounded reclaim scan in [`crate::reclaim`] cheap: it can walk from the
//! front and stop early without sorting.
//!
//! All mutations take the write lock, so any individual field mutation is
//! indivisible from the point of view of readers, and the reclaim scan sees
//! a consistent snapshot of size and status.

use indexmap::IndexMap;
use tokio::sync::RwLock;

use crate::error::CoreError;
use crate::job::{Job, JobStatus};

/// In-memory registry of generation jobs.
#[derive(Default)]
pub struct JobStore {
    pub(crate) jobs: RwLock<IndexMap<String, Job>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a freshly created job.
    ///
    /// Fails with [`CoreError::Conflict`] if the id is already present,
    /// which should never happen given UUID job ids.
    pub async fn insert(&self, job: Job) -> Result<(), CoreError> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job.id) {
            return Err(CoreError::Conflict(format!(
                "Job id already tracked: {}",
                job.id
            )));
        }
        jobs.insert(job.id.clone(), job);
        Ok(())
    }

    /// Read-only snapshot of one job.
    pub async fn get(&self, id: &str) -> Option<Job> {
        self.jobs.read().await.get(id).cloned()
    }

    /// Apply a field-level mutation under the write lock.
    ///
    /// Returns `false` (and does nothing) when the id is absent — the job
    /// may have been reclaimed between the caller's lookup and this call.
    pub async fn update<F>(&self, id: &str, mutator: F) -> bool
    where
        F: FnOnce(&mut Job),
    {
        let mut jobs = self.jobs.write().await;
        match jobs.get_mut(id) {
            Some(job) => {
                mutator(job);
                true
            }
            None => false,
        }
    }

    /// Like [`update`](Self::update), but skips the mutation when the job
    /// has already reached a terminal state. Used for completion and
    /// failure transitions so a cancelled job is never overwritten.
    ///
    /// Returns the status the job held *before* the call, or `None` when
    /// the id is absent.
    pub async fn update_non_terminal<F>(&self, id: &str, mutator: F) -> Option<JobStatus>
    where
        F: FnOnce(&mut Job),
    {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(id)?;
        let prior = job.status;
        if !prior.is_terminal() {
            mutator(job);
        }
        Some(prior)
    }

    /// Cooperatively cancel a job.
    ///
    /// Only `queued` and `running` jobs flip to `cancelled`; a job that
    /// already reached a terminal state is left untouched. Returns the
    /// resulting status, or `None` when the id is unknown.
    pub async fn cancel(&self, id: &str) -> Option<JobStatus> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(id)?;
        if !job.status.is_terminal() {
            job.status = JobStatus::Cancelled;
        }
        Some(job.status)
    }

    /// Count jobs matching a predicate (health reporting).
    pub async fn count_where<P>(&self, pred: P) -> usize
    where
        P: Fn(&Job) -> bool,
    {
        self.jobs.read().await.values().filter(|j| pred(j)).count()
    }

    /// Number of tracked jobs.
    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }
}
