//! Integration test utilities for the tracker API
//!
//! Spawns the real router on an ephemeral port, backed by in-memory
//! repositories and storage, and drives it over HTTP.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
pub use tracker_service::testing::MemoryBackend;
