//! Integration tests for the opportunistic reclaim pass that runs at the
//! top of each POST /generate.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::post_json;
use scenegen_core::{Job, JobStatus};
use serde_json::json;

/// Insert a job with a forced status and age directly into the store.
async fn seed_job(
    state: &scenegen_api::state::AppState,
    id: &str,
    status: JobStatus,
    age_secs: i64,
) {
    let mut job = Job::queued(id.to_string(), 9, 9, 1);
    job.status = status;
    job.created_at = Utc::now() - Duration::seconds(age_secs);
    state.jobs.insert(job).await.unwrap();
}

#[tokio::test]
async fn generate_reclaims_finished_jobs_over_capacity() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = common::test_config(dir.path().to_path_buf());
    config.max_jobs = 3;
    let (app, state) = common::build_test_app(config);

    for i in 0..5 {
        seed_job(&state, &format!("done{i}"), JobStatus::Completed, 100).await;
    }
    seed_job(&state, "young-queued", JobStatus::Queued, 50).await;
    assert_eq!(state.jobs.len().await, 6);

    let body = json!({ "episode_id": 1, "scene_id": 2, "prompt": "a cat" });
    let response = post_json(app, "/generate", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Reclaim trimmed finished jobs back toward capacity before the new
    // job was inserted; the young queued job must survive.
    assert_eq!(state.jobs.len().await, 3);
    assert!(state.jobs.get("young-queued").await.is_some());
    assert!(state.jobs.get("done0").await.is_none());
}

#[tokio::test]
async fn generate_reclaims_expired_jobs_regardless_of_status() {
    let dir = tempfile::tempdir().unwrap();
    let (app, state) = common::build_test_app(common::test_config(dir.path().to_path_buf()));

    seed_job(&state, "expired-queued", JobStatus::Queued, 4000).await;
    seed_job(&state, "expired-running", JobStatus::Running, 3700).await;
    seed_job(&state, "fresh-queued", JobStatus::Queued, 30).await;

    let body = json!({ "episode_id": 1, "scene_id": 2, "prompt": "a cat" });
    let response = post_json(app, "/generate", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    assert!(state.jobs.get("expired-queued").await.is_none());
    assert!(state.jobs.get("expired-running").await.is_none());
    assert!(state.jobs.get("fresh-queued").await.is_some());
}

#[tokio::test]
async fn active_jobs_survive_capacity_pressure() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = common::test_config(dir.path().to_path_buf());
    config.max_jobs = 2;
    let (app, state) = common::build_test_app(config);

    // All young and active: nothing qualifies for removal, so the store
    // transiently overshoots capacity rather than dropping live work.
    for i in 0..4 {
        seed_job(&state, &format!("active{i}"), JobStatus::Running, 20).await;
    }

    let body = json!({ "episode_id": 1, "scene_id": 2, "prompt": "a cat" });
    let response = post_json(app, "/generate", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    for i in 0..4 {
        assert!(state.jobs.get(&format!("active{i}")).await.is_some());
    }
}
