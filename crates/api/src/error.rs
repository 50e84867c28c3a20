use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use scenegen_core::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce the service's JSON error shape,
/// `{"detail": <message>}` — the body format the job API contract pins
/// (e.g. `404 {"detail": "Job not found"}`).
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `scenegen_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Standard 404 for an unknown job id.
    pub fn job_not_found(id: impl Into<String>) -> Self {
        AppError::Core(CoreError::NotFound {
            entity: "Job",
            id: id.into(),
        })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            AppError::Core(core) => match core {
                // The contract body carries only the entity, not the id.
                CoreError::NotFound { entity, .. } => {
                    (StatusCode::NOT_FOUND, format!("{entity} not found"))
                }
                CoreError::Validation(msg) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "An internal error occurred".to_string(),
                    )
                }
            },
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({ "detail": detail });

        (status, axum::Json(body)).into_response()
    }
}
