//! HTTP surface and job orchestration for the scenegen service.
//!
//! Exposed as a library so integration tests can build the exact router
//! and middleware stack the production binary runs.

pub mod config;
pub mod error;
pub mod handlers;
pub mod orchestrator;
pub mod router;
pub mod state;
