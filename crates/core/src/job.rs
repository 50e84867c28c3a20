//! Job record model for tracked video-generation requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a generation job.
///
/// Transitions are forward-only: `queued → running → {completed | failed |
/// cancelled}`. Once a terminal state is reached no further transition is
/// allowed; in particular a late completion must never overwrite
/// `Cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Accepted, background task not started yet.
    Queued,
    /// Background task is driving the remote call.
    Running,
    /// Artifact produced and moved into place.
    Completed,
    /// Generation errored; see [`Job::error`].
    Failed,
    /// Client requested cancellation before the job committed a result.
    Cancelled,
}

impl JobStatus {
    /// True for states from which no further transition is allowed.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled
        )
    }

    /// True for states eligible for capacity-based reclaim (`completed`
    /// or `failed`). Cancelled jobs are only removed by TTL so a client
    /// polling after cancellation still finds the record.
    pub fn is_finished(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// One tracked video-generation request.
///
/// `scene_id` serializes as `sceneId` — that spelling is part of the job
/// API contract consumed by the frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    #[serde(rename = "sceneId")]
    pub scene_id: i64,
    pub episode_id: i64,
    pub status: JobStatus,
    /// Coarse progress indicator, 0..=100.
    pub progress: u8,
    /// Artifact revision for this (episode, scene) pair, starting at 1.
    pub version: u32,
    /// Relative path of the produced artifact, set only on completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
    /// Upstream or internal error text, set only on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Creation time; drives the TTL reclaim policy.
    pub created_at: DateTime<Utc>,
}

impl Job {
    /// Build a freshly queued job record.
    pub fn queued(id: String, episode_id: i64, scene_id: i64, version: u32) -> Self {
        Self {
            id,
            scene_id,
            episode_id,
            status: JobStatus::Queued,
            progress: 0,
            version,
            output_path: None,
            error: None,
            created_at: Utc::now(),
        }
    }
}
