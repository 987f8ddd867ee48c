//! Action orchestration
//!
//! One generator call, then for each configured artifact (CSV first, then
//! Markdown): render, publish when enabled, record outputs. Every publish
//! finishes before the next one starts.

use super::publisher::ContentPublisher;
use crate::config::{ActionConfig, ReportPath};
use crate::error::Result;
use crate::traits::{ContentStore, OutputSink, ReportGenerator};
use crate::types::{ArtifactKind, PublishOutcome, UsageReport};

/// Output holding the JSON form of the usage collection
pub const JSON_OUTPUT: &str = "json_result";

/// Record of one publish call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedArtifact {
    /// Artifact kind
    pub kind: ArtifactKind,
    /// Repository-relative path
    pub path: String,
    /// What the publisher did
    pub outcome: PublishOutcome,
}

/// Summary of a completed run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of usage records collected
    pub usages: usize,
    /// Publish calls in the order they ran
    pub published: Vec<PublishedArtifact>,
}

impl RunSummary {
    /// Number of publishes that resulted in a commit
    pub fn commits(&self) -> usize {
        self.published.iter().filter(|p| p.outcome.wrote()).count()
    }
}

/// Run the action end to end
///
/// Errors from the generator, the writes or the output sink abort the run.
/// Artifacts published before the failure stay committed.
pub async fn run_action<G, S, O>(
    config: &ActionConfig,
    generator: &G,
    store: &S,
    outputs: &mut O,
) -> Result<RunSummary>
where
    G: ReportGenerator,
    S: ContentStore,
    O: OutputSink,
{
    let report = generator.action_uses(config.dedup).await?;
    let mut summary = RunSummary {
        usages: report.actions.len(),
        published: Vec::new(),
    };

    let publisher = config
        .push_to
        .as_ref()
        .map(|repo| ContentPublisher::new(store, repo));

    for path in config.report_paths() {
        emit_artifact(
            config,
            generator,
            publisher.as_ref(),
            outputs,
            &report,
            path,
            &mut summary,
        )
        .await?;
    }

    outputs.set_output(JSON_OUTPUT, &report.to_json()?)?;

    tracing::info!(
        usages = summary.usages,
        commits = summary.commits(),
        "action usage report complete"
    );
    Ok(summary)
}

async fn emit_artifact<G, S, O>(
    config: &ActionConfig,
    generator: &G,
    publisher: Option<&ContentPublisher<'_, S>>,
    outputs: &mut O,
    report: &UsageReport,
    path: &ReportPath,
    summary: &mut RunSummary,
) -> Result<()>
where
    G: ReportGenerator,
    S: ContentStore,
    O: OutputSink,
{
    let kind = path.kind();
    let rendition = match kind {
        ArtifactKind::Csv => generator.render_csv(report, config.dedup)?,
        ArtifactKind::Markdown => generator.render_markdown(report, config.dedup)?,
    };

    let Some(rendition) = rendition else {
        tracing::info!(kind = kind.as_str(), "nothing to render");
        return Ok(());
    };

    if let Some(publisher) = publisher {
        let message = kind.commit_message();

        let outcome = publisher
            .publish(path.repo_path(), &message, rendition.primary.as_bytes())
            .await?;
        record(summary, kind, path.repo_path().to_string(), outcome);

        if let Some(unique) = &rendition.unique {
            let unique_path = path.unique_repo_path();
            let outcome = publisher
                .publish(&unique_path, &message, unique.as_bytes())
                .await?;
            record(summary, kind, unique_path, outcome);
        }
    }

    outputs.set_output(kind.output_name(), &rendition.primary)?;
    if let Some(unique) = &rendition.unique {
        outputs.set_output(kind.unique_output_name(), unique)?;
    }

    Ok(())
}

fn record(summary: &mut RunSummary, kind: ArtifactKind, path: String, outcome: PublishOutcome) {
    tracing::info!(
        kind = kind.as_str(),
        path = %path,
        outcome = outcome.as_str(),
        "artifact published"
    );
    summary.published.push(PublishedArtifact {
        kind,
        path,
        outcome,
    });
}
