//! Video generation backends.
//!
//! Exposes the [`VideoGenerator`] capability trait plus three
//! implementations selected by [`GeneratorMode`]:
//!
//! - [`remote::RemoteGenerator`] — calls a hosted Gradio space over HTTP.
//! - [`mock::MockGenerator`] — synthesizes a fixed tiny clip after a short
//!   delay, for tests and offline demos.
//! - [`local::LocalGenerator`] — intentionally unimplemented stub.

pub mod client;
pub mod error;
pub mod local;
pub mod mock;
pub mod remote;

use std::sync::Arc;

pub use client::{GenerationRequest, GeneratorMode, VideoGenerator};
pub use error::GeneratorError;

/// Build the generator implementation for the given mode.
///
/// * `space` — remote space identifier or full base URL (remote mode only).
/// * `token` — bearer token for the remote endpoint, if any.
pub fn build_generator(
    mode: GeneratorMode,
    space: &str,
    token: Option<String>,
) -> Arc<dyn VideoGenerator> {
    match mode {
        GeneratorMode::Remote => Arc::new(remote::RemoteGenerator::new(space, token)),
        GeneratorMode::Local => Arc::new(local::LocalGenerator),
        GeneratorMode::Mock => Arc::new(mock::MockGenerator::default()),
    }
}
