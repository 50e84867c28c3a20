/// Errors from the generation backends.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote endpoint returned a non-2xx status code.
    #[error("Remote endpoint error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The remote endpoint answered with something we could not interpret
    /// (missing event id, malformed result payload, error event).
    #[error("Remote protocol error: {0}")]
    Protocol(String),

    /// The backend produced no artifact, or the reported artifact is gone.
    #[error("Output video file missing from result: {0}")]
    MissingArtifact(String),

    /// Filesystem error while staging the artifact.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The selected mode has no working implementation.
    #[error("{0}")]
    Unsupported(String),
}
