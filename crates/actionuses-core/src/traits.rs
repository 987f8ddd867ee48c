//! Trait seams for the storage backend, report generator and output sink
//!
//! Async methods return `impl Future + Send` so implementations are resolved
//! at compile time: no boxing, no dynamic dispatch.

use crate::error::Result;
use crate::types::{
    CommitDescriptor, DedupMode, RemoteFile, RepoCoordinates, Rendition, UsageReport,
    WriteReceipt,
};
use std::future::Future;

/// Hosted repository content storage (GitHub contents API or a stand-in)
pub trait ContentStore {
    /// Read the file at `path`.
    ///
    /// `Ok(None)` means the file does not exist. Any other failure is `Err`.
    fn get_content<'a>(
        &'a self,
        repo: &'a RepoCoordinates,
        path: &'a str,
    ) -> impl Future<Output = Result<Option<RemoteFile>>> + Send + 'a;

    /// Create or replace the file described by `commit`.
    ///
    /// Backends reject a missing or stale `sha` for an existing file.
    fn create_or_update_file_contents<'a>(
        &'a self,
        commit: &'a CommitDescriptor<'a>,
    ) -> impl Future<Output = Result<WriteReceipt>> + Send + 'a;
}

/// Producer of action usage reports
pub trait ReportGenerator {
    /// Collect action usages for the configured scope
    fn action_uses(&self, mode: DedupMode) -> impl Future<Output = Result<UsageReport>> + Send;

    /// Render CSV; `None` when there is nothing to render
    fn render_csv(&self, report: &UsageReport, mode: DedupMode) -> Result<Option<Rendition>>;

    /// Render Markdown; `None` when there is nothing to render
    fn render_markdown(&self, report: &UsageReport, mode: DedupMode)
        -> Result<Option<Rendition>>;
}

/// Destination of named action outputs
pub trait OutputSink {
    /// Record output `name` with `value`
    fn set_output(&mut self, name: &str, value: &str) -> Result<()>;
}
