//! Background driver for one generation job.
//!
//! [`run_generation`] is spawned per accepted request and walks the job
//! through `running → {completed | failed}`, checking for cooperative
//! cancellation at defined checkpoints: before decoding the image, before
//! the remote call, and before the destructive move of the artifact. A job
//! already inside the remote call cannot be aborted mid-flight — only
//! prevented from committing its result.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use scenegen_core::{Job, JobStatus};
use scenegen_generator::GenerationRequest;
use tempfile::TempPath;

use crate::state::AppState;

/// Drive `job` to a terminal state.
///
/// Every terminal update goes through the store's non-terminal guard, so a
/// cancellation that lands first is never overwritten.
pub async fn run_generation(
    state: AppState,
    job: Job,
    prompt: String,
    negative_prompt: String,
    image_base64: Option<String>,
) {
    let job_id = job.id.clone();

    // Checkpoint: flip to running unless cancellation already landed.
    match state
        .jobs
        .update_non_terminal(&job_id, |j| {
            j.status = JobStatus::Running;
            j.progress = 5;
        })
        .await
    {
        None => {
            tracing::warn!(job_id = %job_id, "Job vanished before start; abandoning");
            return;
        }
        Some(prior) if prior.is_terminal() => {
            tracing::info!(job_id = %job_id, "Job cancelled before start; abandoning");
            return;
        }
        Some(_) => {}
    }

    tracing::info!(
        job_id = %job_id,
        scene_id = job.scene_id,
        version = job.version,
        "Generation started"
    );

    // The decoded image rides a TempPath: dropped (and deleted) on every
    // exit path of this function. Decode failure is best-effort — log and
    // generate without the image.
    let temp_image: Option<TempPath> = image_base64.as_deref().and_then(|b64| {
        match decode_image_to_temp(b64) {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!(job_id = %job_id, error = %e, "Image decode failed; proceeding without image");
                None
            }
        }
    });

    // Checkpoint: last look before committing to the remote call.
    if is_cancelled(&state, &job_id).await {
        tracing::info!(job_id = %job_id, "Job cancelled before generation; abandoning");
        return;
    }

    let request = GenerationRequest {
        prompt,
        negative_prompt,
        image: temp_image.as_deref().map(Path::to_path_buf),
    };

    let deadline = Duration::from_secs(state.config.remote_timeout_secs);
    let artifact = match tokio::time::timeout(deadline, state.generator.generate(&request)).await
    {
        Err(_) => {
            fail_job(
                &state,
                &job_id,
                format!(
                    "Remote generation timed out after {}s",
                    state.config.remote_timeout_secs
                ),
            )
            .await;
            return;
        }
        Ok(Err(e)) => {
            fail_job(&state, &job_id, e.to_string()).await;
            return;
        }
        Ok(Ok(path)) => path,
    };

    // Checkpoint: before the destructive move. The produced temp artifact
    // is ours to discard if cancellation won the race.
    if is_cancelled(&state, &job_id).await {
        tracing::info!(job_id = %job_id, "Job cancelled after generation; discarding artifact");
        let _ = tokio::fs::remove_file(&artifact).await;
        return;
    }

    if tokio::fs::metadata(&artifact).await.is_err() {
        fail_job(
            &state,
            &job_id,
            "Output video file missing from generation result".to_string(),
        )
        .await;
        return;
    }

    let filename = format!("scene{}_v{}.mp4", job.scene_id, job.version);
    let dest = state
        .config
        .output_dir
        .join(job.episode_id.to_string())
        .join(&filename);

    if let Err(e) = move_file(&artifact, &dest).await {
        fail_job(
            &state,
            &job_id,
            format!("Cannot move artifact into place: {e}"),
        )
        .await;
        return;
    }

    let output_path = format!("{}/{filename}", job.episode_id);
    let prior = state
        .jobs
        .update_non_terminal(&job_id, |j| {
            j.status = JobStatus::Completed;
            j.progress = 100;
            j.output_path = Some(output_path.clone());
        })
        .await;

    match prior {
        Some(s) if s.is_terminal() => {
            // Cancellation landed between the move and the commit.
            tracing::info!(job_id = %job_id, "Job cancelled at commit; removing artifact");
            let _ = tokio::fs::remove_file(&dest).await;
        }
        _ => {
            tracing::info!(job_id = %job_id, output_path = %output_path, "Generation completed");
        }
    }
}

/// True when the job is cancelled — or gone, which equally means stop.
async fn is_cancelled(state: &AppState, job_id: &str) -> bool {
    match state.jobs.get(job_id).await {
        Some(job) => job.status == JobStatus::Cancelled,
        None => true,
    }
}

/// Mark the job failed with the given error text (unless already terminal).
async fn fail_job(state: &AppState, job_id: &str, error: String) {
    tracing::error!(job_id = %job_id, error = %error, "Generation failed");
    state
        .jobs
        .update_non_terminal(job_id, |j| {
            j.status = JobStatus::Failed;
            j.error = Some(error.clone());
        })
        .await;
}

/// Decode a base64 image payload (raw, or prefixed with a
/// `data:image/...;base64,` header) into a self-deleting temp file.
fn decode_image_to_temp(payload: &str) -> Result<TempPath, String> {
    let encoded = match payload.split_once(',') {
        Some((_, rest)) => rest,
        None => payload,
    };

    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| format!("invalid base64: {e}"))?;

    let mut file = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .map_err(|e| format!("cannot create temp file: {e}"))?;
    file.write_all(&bytes)
        .map_err(|e| format!("cannot write temp file: {e}"))?;

    Ok(file.into_temp_path())
}

/// Move a file, falling back to copy-and-remove when the source and
/// destination live on different filesystems.
async fn move_file(src: &Path, dest: &Path) -> std::io::Result<()> {
    match tokio::fs::rename(src, dest).await {
        Ok(()) => Ok(()),
        Err(_) => {
            tokio::fs::copy(src, dest).await?;
            tokio::fs::remove_file(src).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_1X1_B64: &str =
        "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8BQDwAEhQGAhKmMIQAAAABJRU5ErkJggg==";

    #[test]
    fn decodes_raw_base64() {
        let path = decode_image_to_temp(PNG_1X1_B64).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn strips_data_uri_header() {
        let payload = format!("data:image/png;base64,{PNG_1X1_B64}");
        let path = decode_image_to_temp(&payload).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn temp_image_is_deleted_on_drop() {
        let path = decode_image_to_temp(PNG_1X1_B64).unwrap();
        let location = path.to_path_buf();
        assert!(location.exists());
        drop(path);
        assert!(!location.exists());
    }

    #[test]
    fn rejects_garbage_payloads() {
        assert!(decode_image_to_temp("!!not-base64!!").is_err());
    }

    #[tokio::test]
    async fn move_file_replaces_rename_across_filesystems() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.mp4");
        let dest = dir.path().join("dest.mp4");
        std::fs::write(&src, b"clip").unwrap();

        move_file(&src, &dest).await.unwrap();

        assert!(!src.exists());
        assert_eq!(std::fs::read(&dest).unwrap(), b"clip");
    }
}
