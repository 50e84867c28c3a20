use std::path::PathBuf;

use scenegen_core::ReclaimParams;
use scenegen_generator::GeneratorMode;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Root directory for generated artifacts.
    pub output_dir: PathBuf,
    /// Hosted space id (`owner/name`) or full base URL of the remote
    /// generation endpoint.
    pub space: String,
    /// Bearer token for the remote endpoint, if required.
    pub hf_token: Option<String>,
    /// Which generation backend to run with.
    pub generator_mode: GeneratorMode,
    /// Soft capacity of the in-memory job store.
    pub max_jobs: usize,
    /// Age in seconds past which tracked jobs are reclaimed.
    pub job_ttl_secs: u64,
    /// Upper bound on entries examined per reclaim pass.
    pub reclaim_scan_limit: usize,
    /// Deadline for one remote generation call, in seconds.
    pub remote_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                       |
    /// |--------------------------|-------------------------------|
    /// | `HOST`                   | `0.0.0.0`                     |
    /// | `PORT`                   | `8000`                        |
    /// | `CORS_ORIGINS`           | `http://localhost:5173`       |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                          |
    /// | `OUTPUT_DIR`             | `../../outputs`               |
    /// | `VIDEO_GENERATOR_SPACE`  | `Lightricks/ltx-2-distilled`  |
    /// | `HF_TOKEN`               | (unset)                       |
    /// | `GENERATOR_MODE`         | `remote`                      |
    /// | `MAX_JOBS`               | `100`                         |
    /// | `JOB_TTL_SECS`           | `3600`                        |
    /// | `RECLAIM_SCAN_LIMIT`     | `200`                         |
    /// | `REMOTE_TIMEOUT_SECS`    | `600`                         |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let output_dir =
            PathBuf::from(std::env::var("OUTPUT_DIR").unwrap_or_else(|_| "../../outputs".into()));

        let space = std::env::var("VIDEO_GENERATOR_SPACE")
            .unwrap_or_else(|_| "Lightricks/ltx-2-distilled".into());

        let hf_token = std::env::var("HF_TOKEN").ok().filter(|t| !t.is_empty());

        let generator_mode: GeneratorMode = std::env::var("GENERATOR_MODE")
            .unwrap_or_else(|_| "remote".into())
            .parse()
            .expect("GENERATOR_MODE must be remote, local, or mock");

        let max_jobs: usize = std::env::var("MAX_JOBS")
            .unwrap_or_else(|_| "100".into())
            .parse()
            .expect("MAX_JOBS must be a valid usize");

        let job_ttl_secs: u64 = std::env::var("JOB_TTL_SECS")
            .unwrap_or_else(|_| "3600".into())
            .parse()
            .expect("JOB_TTL_SECS must be a valid u64");

        let reclaim_scan_limit: usize = std::env::var("RECLAIM_SCAN_LIMIT")
            .unwrap_or_else(|_| "200".into())
            .parse()
            .expect("RECLAIM_SCAN_LIMIT must be a valid usize");

        let remote_timeout_secs: u64 = std::env::var("REMOTE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "600".into())
            .parse()
            .expect("REMOTE_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            output_dir,
            space,
            hf_token,
            generator_mode,
            max_jobs,
            job_ttl_secs,
            reclaim_scan_limit,
            remote_timeout_secs,
        }
    }

    /// Reclaim policy knobs derived from this configuration.
    pub fn reclaim_params(&self) -> ReclaimParams {
        ReclaimParams {
            max_jobs: self.max_jobs,
            ttl_secs: self.job_ttl_secs,
            scan_limit: self.reclaim_scan_limit,
        }
    }
}
