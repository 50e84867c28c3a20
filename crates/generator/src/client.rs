//! Generation capability trait and request type.

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::GeneratorError;

/// Fixed sampling parameters passed on every generation call.
///
/// These match the positional signature of the hosted space's
/// `/generate_video` and `/generate_image_to_video` endpoints.
pub const USE_RANDOM_SEED: bool = true;
pub const SEED: u32 = 0;
pub const HEIGHT: u32 = 512;
pub const WIDTH: u32 = 768;

/// One generation request handed to a backend.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub negative_prompt: String,
    /// Decoded conditioning image, when the client supplied one. With an
    /// image the backend uses its image-to-video endpoint, otherwise
    /// text-to-video.
    pub image: Option<PathBuf>,
}

/// A video generation capability.
///
/// `generate` returns the path of a produced artifact that the caller owns
/// and may move into place. The call can take minutes; implementations
/// must not hold shared locks while in flight.
#[async_trait::async_trait]
pub trait VideoGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<PathBuf, GeneratorError>;
}

/// Which backend the service runs with, from the `GENERATOR_MODE` env var.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeneratorMode {
    /// Hosted inference endpoint (default).
    #[default]
    Remote,
    /// On-box generation; intentionally unimplemented.
    Local,
    /// Fixed small clip after a fixed delay; no network needed.
    Mock,
}

impl FromStr for GeneratorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "remote" => Ok(GeneratorMode::Remote),
            "local" => Ok(GeneratorMode::Local),
            "mock" => Ok(GeneratorMode::Mock),
            other => Err(format!("Unknown generator mode: {other}")),
        }
    }
}

impl GeneratorMode {
    /// Lowercase name as reported by `/health`.
    pub fn as_str(self) -> &'static str {
        match self {
            GeneratorMode::Remote => "remote",
            GeneratorMode::Local => "local",
            GeneratorMode::Mock => "mock",
        }
    }
}
