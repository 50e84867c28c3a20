//! Shared helpers for api integration tests.
//!
//! Builds the full application router through the same
//! `build_app_router` the production binary uses, with a mock generation
//! backend and a scratch output directory.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use scenegen_api::config::ServerConfig;
use scenegen_api::router::build_app_router;
use scenegen_api::state::AppState;
use scenegen_core::{Job, JobStatus};
use scenegen_generator::mock::MockGenerator;
use scenegen_generator::GeneratorMode;

/// How long the mock backend "generates" for in tests.
pub const MOCK_DELAY: Duration = Duration::from_millis(50);

/// Build a test `ServerConfig` rooted at `output_dir`.
pub fn test_config(output_dir: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        output_dir,
        space: "Lightricks/ltx-2-distilled".to_string(),
        hf_token: None,
        generator_mode: GeneratorMode::Mock,
        max_jobs: 100,
        job_ttl_secs: 3600,
        reclaim_scan_limit: 200,
        remote_timeout_secs: 5,
    }
}

/// Build the application router plus a handle on its state, backed by a
/// mock generator with the default test delay.
pub fn build_test_app(config: ServerConfig) -> (Router, AppState) {
    build_test_app_with_delay(config, MOCK_DELAY)
}

/// Same as [`build_test_app`] with an explicit mock generation delay
/// (longer delays make cancellation races deterministic to test).
pub fn build_test_app_with_delay(config: ServerConfig, delay: Duration) -> (Router, AppState) {
    let generator = Arc::new(MockGenerator::new(delay));
    let state = AppState::new(config.clone(), generator);
    let app = build_app_router(state.clone(), &config);
    (app, state)
}

/// Issue a GET request against the app.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Issue a POST request with a JSON body against the app.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Issue a POST request with no body (cancel endpoint).
pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Poll the store until the job reaches `status`, panicking after 3 s.
pub async fn wait_for_status(state: &AppState, job_id: &str, status: JobStatus) -> Job {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(3);
    loop {
        if let Some(job) = state.jobs.get(job_id).await {
            if job.status == status {
                return job;
            }
        }
        if tokio::time::Instant::now() > deadline {
            panic!("Job {job_id} did not reach {status:?} within 3s");
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
