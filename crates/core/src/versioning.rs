//! Per-(episode, scene) artifact version allocation.
//!
//! Output artifacts are named `scene{scene_id}_v{version}.mp4` inside the
//! episode directory, with `version` starting at 1 and incrementing per
//! request for that pair. The allocator caches the last issued version per
//! pair so only the first request for a pair pays a directory scan.

use std::collections::HashMap;

use tokio::sync::Mutex;

/// Key for one version counter: `(episode_id, scene_id)`.
pub type SceneKey = (i64, i64);

/// Monotonic version counters, keyed by (episode, scene).
///
/// Counters live for the process lifetime and are never evicted; the cost
/// is one `u32` per ever-seen pair. Values record the last version issued,
/// so the next allocation for a cached key is `value + 1`.
#[derive(Default)]
pub struct VersionAllocator {
    counters: Mutex<HashMap<SceneKey, u32>>,
}

impl VersionAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next version for `(episode_id, scene_id)`.
    ///
    /// On a cache miss, `seed` is invoked to count the artifacts already on
    /// disk for the pair (the caller lists `scene{scene_id}_v*.mp4` in the
    /// episode directory) and the counter starts at `seed() + 1`.
    ///
    /// The whole check-cache / scan-and-seed / increment sequence holds the
    /// one mutex, so two concurrent allocations for the same pair can never
    /// be handed the same version.
    pub async fn allocate<F>(&self, episode_id: i64, scene_id: i64, seed: F) -> u32
    where
        F: FnOnce() -> u32,
    {
        let mut counters = self.counters.lock().await;
        let version = match counters.get(&(episode_id, scene_id)) {
            Some(last) => last + 1,
            None => seed() + 1,
        };
        counters.insert((episode_id, scene_id), version);
        version
    }

    /// Number of tracked counters (diagnostics only).
    pub async fn tracked_pairs(&self) -> usize {
        self.counters.lock().await.len()
    }
}
