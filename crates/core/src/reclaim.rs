//! Bounded reclaim (eviction) of tracked jobs.
//!
//! The registry has no background sweeper; reclaim runs opportunistically
//! at the top of each generation request. Two rules, applied during a
//! single bounded scan in insertion order (oldest first):
//!
//! 1. Any job older than the TTL is removed, whatever its status.
//! 2. While the tracked count (net of pending removals) is at or above
//!    capacity, finished jobs (`completed`/`failed`) are removed.
//!
//! The scan stops early once the store is under capacity and the current
//! job is unexpired — everything younger cannot be expired either — and is
//! hard-capped at `scan_limit` entries so a `/generate` call does bounded
//! work no matter how large the store has grown. The cap means the store
//! may transiently overshoot `max_jobs` when no candidates are found in
//! the scanned window.

use chrono::{DateTime, Utc};

use crate::store::JobStore;

/// Tuning knobs for one reclaim pass.
#[derive(Debug, Clone, Copy)]
pub struct ReclaimParams {
    /// Soft capacity of the job store.
    pub max_jobs: usize,
    /// Age in seconds past which any job is removed.
    pub ttl_secs: u64,
    /// Maximum entries examined per pass.
    pub scan_limit: usize,
}

impl Default for ReclaimParams {
    fn default() -> Self {
        Self {
            max_jobs: 100,
            ttl_secs: 3600,
            scan_limit: 200,
        }
    }
}

impl JobStore {
    /// Run one reclaim pass, returning the number of jobs removed.
    ///
    /// The scan and the removals happen under a single write lock, so the
    /// capacity decisions are made against a consistent snapshot and the
    /// removals apply atomically with respect to every other store
    /// operation.
    pub async fn reclaim(&self, params: &ReclaimParams, now: DateTime<Utc>) -> usize {
        let mut jobs = self.jobs.write().await;

        let mut marked: Vec<String> = Vec::new();
        let mut scanned = 0usize;

        for (id, job) in jobs.iter() {
            scanned += 1;

            let age = now.signed_duration_since(job.created_at).num_seconds();
            let expired = age > params.ttl_secs as i64;

            if expired {
                marked.push(id.clone());
            } else if jobs.len() - marked.len() >= params.max_jobs && job.status.is_finished() {
                marked.push(id.clone());
            }

            // Insertion order means every remaining job is younger, so once
            // capacity pressure is relieved and this job is unexpired,
            // nothing further can qualify.
            if jobs.len() - marked.len() < params.max_jobs && !expired {
                break;
            }
            if scanned >= params.scan_limit {
                break;
            }
        }

        for id in &marked {
            jobs.shift_remove(id);
        }

        if !marked.is_empty() {
            tracing::debug!(removed = marked.len(), remaining = jobs.len(), "Reclaimed jobs");
        }
        marked.len()
    }
}
