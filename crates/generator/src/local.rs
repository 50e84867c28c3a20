//! On-box generation stub.

use std::path::PathBuf;

use crate::client::{GenerationRequest, VideoGenerator};
use crate::error::GeneratorError;

/// Placeholder for running inference on local hardware.
///
/// Every call fails with [`GeneratorError::Unsupported`]; jobs submitted
/// under this mode go straight to `failed` with a clear reason.
pub struct LocalGenerator;

#[async_trait::async_trait]
impl VideoGenerator for LocalGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<PathBuf, GeneratorError> {
        Err(GeneratorError::Unsupported(
            "Local generation is not implemented; use remote or mock mode".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[tokio::test]
    async fn always_fails() {
        let req = GenerationRequest {
            prompt: "anything".into(),
            negative_prompt: String::new(),
            image: None,
        };
        let err = LocalGenerator.generate(&req).await.unwrap_err();
        assert_matches!(err, GeneratorError::Unsupported(_));
    }
}
