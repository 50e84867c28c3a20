//! Handler for `POST /generate` — accept a request, record a queued job,
//! and hand the actual work to a background task.

use std::path::Path;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use scenegen_core::{CoreError, Job};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::orchestrator;
use crate::state::AppState;

/// Default negative prompt applied when the client sends none.
const DEFAULT_NEGATIVE_PROMPT: &str =
    "low quality, worst quality, deformed, distorted, watermark";

/// Request body for `POST /generate`.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub episode_id: i64,
    pub scene_id: i64,
    pub prompt: String,
    #[serde(default = "default_negative_prompt")]
    pub negative_prompt: String,
    /// Optional conditioning image, raw base64 or a `data:` URI.
    pub image_base64: Option<String>,
}

fn default_negative_prompt() -> String {
    DEFAULT_NEGATIVE_PROMPT.to_string()
}

/// POST /generate
///
/// Runs an opportunistic reclaim pass, allocates the next artifact version
/// for the (episode, scene) pair, records the job as `queued`, and spawns
/// the generation task. Returns the job record immediately; clients poll
/// `GET /jobs/{id}` for progress.
pub async fn generate(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> AppResult<Json<Job>> {
    if req.prompt.trim().is_empty() {
        return Err(CoreError::Validation("prompt must not be empty".to_string()).into());
    }
    if req.episode_id < 0 || req.scene_id < 0 {
        return Err(
            CoreError::Validation("episode_id and scene_id must be non-negative".to_string())
                .into(),
        );
    }

    // Keep the store bounded; this is the only place eviction runs.
    state
        .jobs
        .reclaim(&state.config.reclaim_params(), Utc::now())
        .await;

    let episode_dir = state.config.output_dir.join(req.episode_id.to_string());
    tokio::fs::create_dir_all(&episode_dir)
        .await
        .map_err(|e| {
            AppError::Internal(format!(
                "Cannot create episode directory {}: {e}",
                episode_dir.display()
            ))
        })?;

    // First allocation for a pair seeds from the artifacts already on disk.
    let scene_id = req.scene_id;
    let seed_dir = episode_dir.clone();
    let version = state
        .versions
        .allocate(req.episode_id, req.scene_id, move || {
            count_existing_versions(&seed_dir, scene_id)
        })
        .await;

    let job = Job::queued(
        uuid::Uuid::new_v4().to_string(),
        req.episode_id,
        req.scene_id,
        version,
    );
    state.jobs.insert(job.clone()).await?;

    tracing::info!(
        job_id = %job.id,
        episode_id = req.episode_id,
        scene_id = req.scene_id,
        version,
        "Job queued"
    );

    tokio::spawn(orchestrator::run_generation(
        state.clone(),
        job.clone(),
        req.prompt,
        req.negative_prompt,
        req.image_base64,
    ));

    Ok(Json(job))
}

/// Count artifacts already on disk matching `scene{scene_id}_v*.mp4`.
fn count_existing_versions(episode_dir: &Path, scene_id: i64) -> u32 {
    let prefix = format!("scene{scene_id}_v");
    let Ok(entries) = std::fs::read_dir(episode_dir) else {
        return 0;
    };
    entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            name.starts_with(&prefix) && name.ends_with(".mp4")
        })
        .count() as u32
}
