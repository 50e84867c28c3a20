//! Domain types and in-memory state for the scenegen service.
//!
//! Holds the job record model, the concurrency-safe job store, the
//! per-(episode, scene) version allocator, and the bounded reclaim
//! (eviction) policy. No internal dependencies; the api and generator
//! crates build on top of this one.

pub mod error;
pub mod job;
pub mod reclaim;
pub mod store;
pub mod versioning;

pub use error::CoreError;
pub use job::{Job, JobStatus};
pub use reclaim::ReclaimParams;
pub use store::JobStore;
pub use versioning::VersionAllocator;
