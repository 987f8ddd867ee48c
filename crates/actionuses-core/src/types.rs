//! Core type definitions

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Target repository of a publish, parsed from `owner/repo`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoCoordinates {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
}

impl RepoCoordinates {
    /// Create coordinates from owner and name
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Parse the `GITHUB_REPOSITORY` format (`owner/repo`)
    pub fn parse(repository: &str) -> Result<Self> {
        match repository.split_once('/') {
            Some((owner, repo))
                if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') =>
            {
                Ok(Self::new(owner, repo))
            }
            _ => Err(Error::Config(format!(
                "Invalid GITHUB_REPOSITORY format: {}",
                repository
            ))),
        }
    }
}

impl fmt::Display for RepoCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Scan scope: exactly one of enterprise or owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Enterprise slug
    Enterprise(String),
    /// Organization or user login
    Owner(String),
}

impl Scope {
    /// Command-line flag and value handed to the external scanner
    pub fn as_args(&self) -> [&str; 2] {
        match self {
            Scope::Enterprise(name) => ["--enterprise", name.as_str()],
            Scope::Owner(name) => ["--owner", name.as_str()],
        }
    }
}

/// Deduplication selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DedupMode {
    /// Raw usage list only
    #[default]
    Off,
    /// Deduplicated action list only
    On,
    /// Both variants; the unique one lands at a `-unique` sibling path
    Both,
}

impl DedupMode {
    /// Parse the `unique` input. Empty means `Off`.
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim() {
            "" | "false" | "False" | "FALSE" => Ok(DedupMode::Off),
            "true" | "True" | "TRUE" => Ok(DedupMode::On),
            "both" | "Both" | "BOTH" => Ok(DedupMode::Both),
            _ => Err(Error::Config(
                "Please provide a valid value for unique: true, false, both".to_string(),
            )),
        }
    }

    /// Whether the generator must compute the deduplicated list
    #[inline]
    pub const fn needs_unique(self) -> bool {
        matches!(self, DedupMode::On | DedupMode::Both)
    }

    /// Get string representation
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            DedupMode::Off => "false",
            DedupMode::On => "true",
            DedupMode::Both => "both",
        }
    }
}

/// Kind of generated report file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ArtifactKind {
    /// Comma-separated values
    Csv,
    /// Markdown table
    Markdown,
}

impl ArtifactKind {
    /// Short name used in output keys and commit messages
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            ArtifactKind::Csv => "csv",
            ArtifactKind::Markdown => "md",
        }
    }

    /// Name of the action output holding the primary rendition
    #[inline]
    pub const fn output_name(self) -> &'static str {
        match self {
            ArtifactKind::Csv => "csv_result",
            ArtifactKind::Markdown => "md_result",
        }
    }

    /// Name of the action output holding the unique rendition
    #[inline]
    pub const fn unique_output_name(self) -> &'static str {
        match self {
            ArtifactKind::Csv => "csv_result_unique",
            ArtifactKind::Markdown => "md_result_unique",
        }
    }

    /// Commit message used when publishing this kind
    pub fn commit_message(self) -> String {
        format!("Save/Update GitHub Actions usage report ({})", self.as_str())
    }
}

/// One discovered `uses:` reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionUse {
    /// Repository containing the workflow (`owner/name`)
    pub repository: String,
    /// Workflow file path inside the repository
    pub workflow: String,
    /// Action reference, e.g. `actions/checkout@v4`
    pub uses: String,
}

/// Usage collection returned by a report generator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageReport {
    /// Every usage, in generator order
    pub actions: Vec<ActionUse>,
    /// Sorted distinct `uses` values; empty when deduplication is off
    pub unique: Vec<String>,
}

impl UsageReport {
    /// Build a report, computing the unique list when `mode` asks for it
    pub fn new(actions: Vec<ActionUse>, mode: DedupMode) -> Self {
        let unique = if mode.needs_unique() {
            let set: std::collections::BTreeSet<&str> =
                actions.iter().map(|a| a.uses.as_str()).collect();
            set.into_iter().map(str::to_owned).collect()
        } else {
            Vec::new()
        };
        Self { actions, unique }
    }

    /// Whether there is nothing to render
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// JSON array of every usage record, whatever the dedup mode
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.actions)?)
    }
}

/// Rendered text of one artifact kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendition {
    /// Primary artifact text
    pub primary: String,
    /// Deduplicated artifact text, only in `Both` mode
    pub unique: Option<String>,
}

impl Rendition {
    /// Pick the variants for `mode` from the two renderers
    ///
    /// Returns `None` when the report is empty.
    pub fn build<A, U>(
        report: &UsageReport,
        mode: DedupMode,
        render_actions: A,
        render_unique: U,
    ) -> Option<Self>
    where
        A: Fn(&[ActionUse]) -> String,
        U: Fn(&[String]) -> String,
    {
        if report.is_empty() {
            return None;
        }

        Some(match mode {
            DedupMode::Off => Rendition {
                primary: render_actions(&report.actions),
                unique: None,
            },
            DedupMode::On => Rendition {
                primary: render_unique(&report.unique),
                unique: None,
            },
            DedupMode::Both => Rendition {
                primary: render_actions(&report.actions),
                unique: Some(render_unique(&report.unique)),
            },
        })
    }
}

/// Stored file as read from the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    /// Version identifier (blob SHA)
    pub sha: String,
    /// Decoded raw bytes
    pub content: Vec<u8>,
}

/// Identity recorded as committer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Committer<'a> {
    /// Display name
    pub name: &'a str,
    /// Email address
    pub email: &'a str,
}

impl Committer<'static> {
    /// The GitHub Actions bot account
    pub const ACTIONS_BOT: Committer<'static> = Committer {
        name: "github-actions[bot]",
        email: "41898282+github-actions[bot]@users.noreply.github.com",
    };
}

/// Everything needed to submit one create-or-update call
#[derive(Debug, Clone, Copy)]
pub struct CommitDescriptor<'a> {
    /// Target repository
    pub repo: &'a RepoCoordinates,
    /// Repository-relative path (POSIX separators)
    pub path: &'a str,
    /// Commit message
    pub message: &'a str,
    /// Raw payload bytes
    pub content: &'a [u8],
    /// Version identifier of the replaced file; `None` creates
    pub sha: Option<&'a str>,
    /// Committer identity
    pub committer: Committer<'a>,
}

/// Backend acknowledgement of a write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReceipt {
    /// Version identifier of the new content
    pub sha: String,
}

/// Result of one publish call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Stored content already matched; nothing written
    Unchanged,
    /// File did not exist (or could not be read) and was written
    Created {
        /// New version identifier
        sha: String,
    },
    /// Existing file was replaced
    Updated {
        /// Version identifier that was replaced
        previous_sha: String,
        /// New version identifier
        sha: String,
    },
}

impl PublishOutcome {
    /// Whether a write was issued
    #[inline]
    pub const fn wrote(&self) -> bool {
        !matches!(self, PublishOutcome::Unchanged)
    }

    /// Get string representation
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            PublishOutcome::Unchanged => "unchanged",
            PublishOutcome::Created { .. } => "created",
            PublishOutcome::Updated { .. } => "updated",
        }
    }
}
