//! Coordination of the report flow
//!
//! - `publisher`: idempotent content publishing
//! - `runner`: end-to-end action orchestration

pub mod publisher;
pub mod runner;

pub use publisher::ContentPublisher;
pub use runner::{run_action, PublishedArtifact, RunSummary, JSON_OUTPUT};
