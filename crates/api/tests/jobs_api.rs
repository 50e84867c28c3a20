//! Integration tests for job polling, completion, and cancellation.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::{body_json, get, post_empty, post_json};
use scenegen_core::{Job, JobStatus};
use serde_json::json;

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_job_returns_404_with_detail() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _state) = common::build_test_app(common::test_config(dir.path().to_path_buf()));

    let response = get(app, "/jobs/does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["detail"], "Job not found");
}

#[tokio::test]
async fn cancel_unknown_job_returns_404() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _state) = common::build_test_app(common::test_config(dir.path().to_path_buf()));

    let response = post_empty(app, "/jobs/does-not-exist/cancel").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["detail"], "Job not found");
}

// ---------------------------------------------------------------------------
// Completion (mock backend)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn job_completes_and_reports_artifact_path() {
    let dir = tempfile::tempdir().unwrap();
    let (app, state) = common::build_test_app(common::test_config(dir.path().to_path_buf()));

    let body = json!({ "episode_id": 1, "scene_id": 2, "prompt": "a cat" });
    let created = body_json(post_json(app.clone(), "/generate", body).await).await;
    let job_id = created["id"].as_str().unwrap().to_string();

    common::wait_for_status(&state, &job_id, JobStatus::Completed).await;

    let response = get(app, &format!("/jobs/{job_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let job = body_json(response).await;
    assert_eq!(job["status"], "completed");
    assert_eq!(job["progress"], 100);
    assert_eq!(job["output_path"], "1/scene2_v1.mp4");

    // The artifact really exists at the documented location.
    let artifact = dir.path().join("1").join("scene2_v1.mp4");
    assert!(artifact.exists(), "artifact missing at {}", artifact.display());
}

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cancel_queued_job_prevents_any_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let (app, state) = common::build_test_app(common::test_config(dir.path().to_path_buf()));

    // A queued job with no background task attached: the cancel must land
    // before any "running" checkpoint could.
    let job = Job::queued("queued-job".to_string(), 1, 2, 1);
    state.jobs.insert(job).await.unwrap();

    let response = post_empty(app.clone(), "/jobs/queued-job/cancel").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "cancelled");

    let job = state.jobs.get("queued-job").await.unwrap();
    assert_eq!(job.status, JobStatus::Cancelled);
    assert!(job.output_path.is_none());
    assert!(!dir.path().join("1").join("scene2_v1.mp4").exists());
}

#[tokio::test]
async fn cancel_running_job_discards_the_result() {
    let dir = tempfile::tempdir().unwrap();
    // Slow mock so the cancel lands while generation is in flight.
    let (app, state) = common::build_test_app_with_delay(
        common::test_config(dir.path().to_path_buf()),
        Duration::from_millis(300),
    );

    let body = json!({ "episode_id": 1, "scene_id": 2, "prompt": "a cat" });
    let created = body_json(post_json(app.clone(), "/generate", body).await).await;
    let job_id = created["id"].as_str().unwrap().to_string();

    common::wait_for_status(&state, &job_id, JobStatus::Running).await;

    let response = post_empty(app.clone(), &format!("/jobs/{job_id}/cancel")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "cancelled");

    // Give the background task time to hit its next checkpoint.
    tokio::time::sleep(Duration::from_millis(600)).await;

    let job = state.jobs.get(&job_id).await.unwrap();
    assert_eq!(job.status, JobStatus::Cancelled, "completion must not overwrite cancel");
    assert!(job.output_path.is_none());
    assert!(!dir.path().join("1").join("scene2_v1.mp4").exists());
}

#[tokio::test]
async fn cancel_completed_job_reports_actual_status() {
    let dir = tempfile::tempdir().unwrap();
    let (app, state) = common::build_test_app(common::test_config(dir.path().to_path_buf()));

    let body = json!({ "episode_id": 1, "scene_id": 2, "prompt": "a cat" });
    let created = body_json(post_json(app.clone(), "/generate", body).await).await;
    let job_id = created["id"].as_str().unwrap().to_string();

    common::wait_for_status(&state, &job_id, JobStatus::Completed).await;

    let response = post_empty(app, &format!("/jobs/{job_id}/cancel")).await;
    assert_eq!(response.status(), StatusCode::OK);
    // Terminal job is untouched; the response reports what it actually is.
    assert_eq!(body_json(response).await["status"], "completed");
}
