//! Health probe for the service and its environment.

use std::path::{Path, PathBuf};

use axum::extract::State;
use axum::Json;
use scenegen_core::JobStatus;
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Active generation backend (`remote`, `local`, or `mock`).
    pub mode: &'static str,
    /// Whether an NVIDIA GPU driver is present on this host.
    pub cuda_available: bool,
    /// Free space on the output volume, `"{:.2} GB"` or `"Unknown"`.
    pub disk_free: String,
    /// Number of jobs currently in the `running` state.
    pub active_jobs: usize,
}

/// GET /health
///
/// Environment probes are best-effort: an unreadable output volume
/// reports `"Unknown"` disk space rather than an error.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let active_jobs = state
        .jobs
        .count_where(|j| j.status == JobStatus::Running)
        .await;

    let output_dir = state.config.output_dir.clone();
    let disk_free = match tokio::task::spawn_blocking(move || free_disk_bytes(&output_dir)).await {
        Ok(Some(free)) => format!("{:.2} GB", free as f64 / (1u64 << 30) as f64),
        _ => "Unknown".to_string(),
    };

    Json(HealthResponse {
        status: "ok",
        mode: state.config.generator_mode.as_str(),
        cuda_available: cuda_available(),
        disk_free,
        active_jobs,
    })
}

/// Probe for an NVIDIA GPU by checking for the kernel driver interface.
fn cuda_available() -> bool {
    Path::new("/proc/driver/nvidia/version").exists()
}

/// Free bytes on the filesystem holding `path`, via `statvfs`.
fn free_disk_bytes(path: &PathBuf) -> Option<u64> {
    #[cfg(unix)]
    {
        use std::ffi::CString;
        use std::mem::MaybeUninit;

        let c_path = CString::new(path.to_string_lossy().as_bytes()).ok()?;
        let mut stat = MaybeUninit::<libc::statvfs>::uninit();

        // Safety: libc::statvfs is well-defined for valid paths.
        let ret = unsafe { libc::statvfs(c_path.as_ptr(), stat.as_mut_ptr()) };
        if ret == 0 {
            let stat = unsafe { stat.assume_init() };
            return Some(stat.f_bavail as u64 * stat.f_frsize as u64);
        }
        None
    }

    #[cfg(not(unix))]
    {
        let _ = path;
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_disk_bytes_on_valid_path() {
        // Root is always statable on Unix.
        #[cfg(unix)]
        assert!(free_disk_bytes(&PathBuf::from("/")).is_some());
    }

    #[test]
    fn free_disk_bytes_on_missing_path_is_none() {
        assert!(free_disk_bytes(&PathBuf::from("/definitely/not/a/real/path")).is_none());
    }
}
