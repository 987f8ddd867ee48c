//! Report rendering and action output formatting

pub mod command;
pub mod csv;
pub mod markdown;
pub mod writer;

pub use writer::{GitHubOutputFile, MemoryOutputs};
