//! Offline mock backend.
//!
//! Synthesizes a fixed one-frame MP4 after a configurable delay so the
//! full job lifecycle can be exercised without network access or a GPU.

use std::path::PathBuf;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::client::{GenerationRequest, VideoGenerator};
use crate::error::GeneratorError;

/// Tiny 1x1 black-pixel MP4, base64 encoded.
const MOCK_MP4_B64: &str = "AAAAIGZ0eXBpc29tAAACAGlzb21pc28yYXZjMW1wNDEAAAAIZnJlZQAAAAWJbWRhdAAAAAAAAAAwZ2JjdHcAAAAAAAAAAQAAAABnZmNjAAAAZmZmZgEAAAAgZnJjZwAAAAEAAAAAAAEAAQAAAAEAAAAAAAAAAQAAAAAAAAAgbXZoZAAAAABWJ68AVievAAABAAABAAAAAAEAAAEAAAAAAAAAAAAAAAABAAAAAAAAAAAAAAAAAAAAAQAAAAAAAAAAAAAAAAAAQAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAIAAAIGdHJhawAAAAx0a2hkAAAAAVYnrwAAAAEAAAAAAAEAAAAAAAAAAAAAAAEAAAAAAQAAAAAAAAAAAAAAAAAAAAEAAAAAAAAAAAAAAAAAAEAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAACAAAAHm1kaWEAAAAIbWRoZAAAAABWJ68AAAAAAAEAAAEAAAAAAAAAAAAAAAABAAAAAAAAAAAAAAABAAAAHgAAAAAAAAAAMWhkbHIAAAAAAAAAAHZpZGUAAAAAAAAAAAAAAAF2bWluZgAAAAhmaGQAAAAAAAAAJGRpbmYAAAAcZHJlZgAAAAAAAAABAAAADHVybCAAAAABAAAA5HN0YmwAAACkc3RzZAAAAAAAAAABAAAAhGF2YzEAAAAAAAAAAQABAAAAAAAAAAAAAAAAAAAAAAEAAAEAAAEAAAAAAAAAAQAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAY//8AAAAxYXZjQwH0AAr/4QAZZ/QACq609QAFAAAAAwAEAAAGUeLF8uCDQAAAAAYD6AAAABhzdHRzAAAAAAAAAAEAAAABAAABAAAAABxzdHNjAAAAAAAAAAEAAAABAAAAAQAAAAEAAAAwc3R6MgAAAAAAAAAAAAABAAAAFHN0Y28AAAAAAAAAAQAAADAAAAAAY3R0cwAAAAAAAAAAAAABAAAABAAAAAA=";

/// Default simulated generation time.
const DEFAULT_DELAY: Duration = Duration::from_secs(2);

/// Backend that writes [`MOCK_MP4_B64`] to a temp file after `delay`.
pub struct MockGenerator {
    delay: Duration,
}

impl MockGenerator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

#[async_trait::async_trait]
impl VideoGenerator for MockGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<PathBuf, GeneratorError> {
        tracing::debug!(
            prompt = %request.prompt,
            has_image = request.image.is_some(),
            delay_ms = self.delay.as_millis() as u64,
            "Mock generation started"
        );
        tokio::time::sleep(self.delay).await;

        let data = STANDARD
            .decode(MOCK_MP4_B64)
            .map_err(|e| GeneratorError::Protocol(format!("Mock payload corrupt: {e}")))?;

        let file = tempfile::Builder::new().suffix(".mp4").tempfile()?;
        tokio::fs::write(file.path(), &data).await?;
        // The caller owns the artifact from here and moves it into place.
        Ok(file.into_temp_path().keep().map_err(std::io::Error::from)?)
    }
}
