//! # action-uses core
//!
//! Reports which GitHub Actions an organization or enterprise uses, and
//! publishes the report to a repository without producing spurious commits.
//!
//! The pieces:
//! - **Configuration** ([`ActionConfig`]): validated action inputs, with
//!   output paths confined to the workspace root
//! - **Report generation** ([`ReportGenerator`]): an external scanner produces
//!   the usage collection, rendered here as CSV and Markdown
//! - **Publishing** ([`ContentPublisher`]): read, compare byte-for-byte, write
//!   only on change, through the GitHub contents API
//! - **Outputs** ([`OutputSink`]): `$GITHUB_OUTPUT` or an in-memory map
//!
//! ## Example
//!
//! ```no_run
//! use actionuses_core::{ActionConfig, ActionInputs, output::MemoryOutputs, scan_and_publish};
//! use std::borrow::Cow;
//!
//! # async fn example() -> actionuses_core::Result<()> {
//! let config = ActionConfig::from_inputs(&ActionInputs {
//!     token: Some(Cow::Borrowed("ghs_...")),
//!     owner: Some(Cow::Borrowed("octo")),
//!     csv: Some(Cow::Borrowed("reports/actions.csv")),
//!     workspace: Some(Cow::Borrowed("/github/workspace")),
//!     ..Default::default()
//! })?;
//!
//! let mut outputs = MemoryOutputs::new();
//! let summary = scan_and_publish(&config, "action-uses-scanner", "https://api.github.com", &mut outputs).await?;
//! println!("{} usages", summary.usages);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs, rust_2018_idioms)]

pub mod config;
pub mod coordination;
pub mod error;
pub mod generator;
pub mod http;
pub mod memory;
pub mod output;
pub mod platform;
pub mod traits;
pub mod types;

pub use config::{ActionConfig, ActionInputs, ReportPath};
pub use coordination::{run_action, ContentPublisher, RunSummary};
pub use error::{Error, ErrorKind, Result};
pub use generator::ProcessReportGenerator;
pub use http::GitHubApiClient;
pub use traits::{ContentStore, OutputSink, ReportGenerator};
pub use types::{
    ActionUse, ArtifactKind, DedupMode, PublishOutcome, RepoCoordinates, Rendition, Scope,
    UsageReport,
};

/// Run the action against GitHub with the external scanner
///
/// This is the main entry point for the library. It wires the process-backed
/// generator and the contents API client into [`run_action`].
pub async fn scan_and_publish<O: OutputSink>(
    config: &ActionConfig,
    scanner: &str,
    api_url: &str,
    outputs: &mut O,
) -> Result<RunSummary> {
    let generator = ProcessReportGenerator::from_config(scanner, config);
    let client = GitHubApiClient::new(api_url, config.token());
    run_action(config, &generator, &client, outputs).await
}

/// Synchronous variant of `scan_and_publish`
///
/// This creates a new Tokio runtime and blocks on the async version.
/// Prefer the async version if you're already in an async context.
pub fn scan_and_publish_sync<O: OutputSink>(
    config: &ActionConfig,
    scanner: &str,
    api_url: &str,
    outputs: &mut O,
) -> Result<RunSummary> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Error::Runtime(e.to_string()))?
        .block_on(scan_and_publish(config, scanner, api_url, outputs))
}
