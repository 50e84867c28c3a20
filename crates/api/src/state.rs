use std::sync::Arc;

use scenegen_core::{JobStore, VersionAllocator};
use scenegen_generator::VideoGenerator;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// In-memory job registry.
    pub jobs: Arc<JobStore>,
    /// Per-(episode, scene) artifact version counters.
    pub versions: Arc<VersionAllocator>,
    /// Generation backend (remote, local stub, or mock).
    pub generator: Arc<dyn VideoGenerator>,
}

impl AppState {
    /// Build fresh state around the given configuration and backend.
    pub fn new(config: ServerConfig, generator: Arc<dyn VideoGenerator>) -> Self {
        Self {
            config: Arc::new(config),
            jobs: Arc::new(JobStore::new()),
            versions: Arc::new(VersionAllocator::new()),
            generator,
        }
    }
}
