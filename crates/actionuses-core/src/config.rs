//! Action input validation
//!
//! [`ActionInputs`] carries the raw strings exactly as the runner hands them
//! over (unset inputs arrive as empty strings). [`ActionConfig::from_inputs`]
//! turns them into a validated configuration or rejects the invocation before
//! any network activity.

use crate::error::{Error, Result};
use crate::platform::PathUtil;
use crate::types::{ArtifactKind, DedupMode, RepoCoordinates, Scope};
use std::borrow::Cow;
use std::fmt;
use std::path::Path;

/// Raw action inputs and the runner environment they depend on
#[derive(Debug, Clone, Default)]
pub struct ActionInputs<'a> {
    /// `token` input
    pub token: Option<Cow<'a, str>>,
    /// `enterprise` input
    pub enterprise: Option<Cow<'a, str>>,
    /// `owner` input
    pub owner: Option<Cow<'a, str>>,
    /// `csv` input, relative to the workspace
    pub csv: Option<Cow<'a, str>>,
    /// `md` input, relative to the workspace
    pub md: Option<Cow<'a, str>>,
    /// `exclude` input (boolean string)
    pub exclude: Option<Cow<'a, str>>,
    /// `unique` input (`true`, `false` or `both`)
    pub unique: Option<Cow<'a, str>>,
    /// `push_results_to_repo` input (boolean string)
    pub push_results_to_repo: Option<Cow<'a, str>>,
    /// `GITHUB_WORKSPACE`
    pub workspace: Option<Cow<'a, str>>,
    /// `GITHUB_REPOSITORY`
    pub repository: Option<Cow<'a, str>>,
}

/// Output file location, validated against the workspace root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPath {
    kind: ArtifactKind,
    repo_path: String,
}

impl ReportPath {
    /// Validate `requested` against `workspace`
    pub fn resolve(kind: ArtifactKind, workspace: &Path, requested: &str) -> Result<Self> {
        let repo_path = PathUtil::contained_relative(workspace, requested)
            .ok_or_else(|| Error::InvalidPath(requested.to_string()))?;
        Ok(Self { kind, repo_path })
    }

    /// Artifact kind stored at this path
    #[inline]
    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    /// Repository-relative POSIX path of the primary artifact
    #[inline]
    pub fn repo_path(&self) -> &str {
        &self.repo_path
    }

    /// Repository-relative path of the deduplicated sibling
    pub fn unique_repo_path(&self) -> String {
        PathUtil::unique_sibling(&self.repo_path)
    }
}

/// Validated action configuration
#[derive(Clone)]
pub struct ActionConfig {
    token: String,
    /// Scan scope
    pub scope: Scope,
    /// CSV artifact location
    pub csv: Option<ReportPath>,
    /// Markdown artifact location
    pub md: Option<ReportPath>,
    /// Passed through to the report generator
    pub exclude: bool,
    /// Deduplication selector
    pub dedup: DedupMode,
    /// Publish target; `None` keeps results in action outputs only
    pub push_to: Option<RepoCoordinates>,
}

impl fmt::Debug for ActionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionConfig")
            .field("token", &"<redacted>")
            .field("scope", &self.scope)
            .field("csv", &self.csv)
            .field("md", &self.md)
            .field("exclude", &self.exclude)
            .field("dedup", &self.dedup)
            .field("push_to", &self.push_to)
            .finish()
    }
}

/// Treat empty strings as unset (the runner sets `INPUT_X=""` for unset inputs)
fn non_empty<'b>(value: &'b Option<Cow<'_, str>>) -> Option<&'b str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Parse a boolean input following the YAML 1.2 core schema
pub fn parse_bool_input(name: &str, value: Option<&str>) -> Result<bool> {
    match value.map(str::trim).unwrap_or("") {
        "" | "false" | "False" | "FALSE" => Ok(false),
        "true" | "True" | "TRUE" => Ok(true),
        _ => Err(Error::Config(format!(
            "Input does not meet YAML 1.2 \"Core Schema\" specification: {}\n\
             Support boolean input list: `true | True | TRUE | false | False | FALSE`",
            name
        ))),
    }
}

impl ActionConfig {
    /// Validate raw inputs
    pub fn from_inputs(inputs: &ActionInputs<'_>) -> Result<Self> {
        let token = non_empty(&inputs.token)
            .ok_or_else(|| Error::Config("Input required and not supplied: token".to_string()))?
            .to_string();

        let scope = match (non_empty(&inputs.enterprise), non_empty(&inputs.owner)) {
            (None, None) => {
                return Err(Error::Config(
                    "Please provide a valid value: enterprise or owner".to_string(),
                ))
            }
            (Some(_), Some(_)) => {
                return Err(Error::Config(
                    "Can only use one of: enterprise, owner".to_string(),
                ))
            }
            (Some(enterprise), None) => Scope::Enterprise(enterprise.to_string()),
            (None, Some(owner)) => Scope::Owner(owner.to_string()),
        };

        let dedup = DedupMode::parse(non_empty(&inputs.unique).unwrap_or(""))?;
        let exclude = parse_bool_input("exclude", non_empty(&inputs.exclude))?;
        let push = parse_bool_input(
            "push_results_to_repo",
            non_empty(&inputs.push_results_to_repo),
        )?;

        let csv = Self::resolve_path(inputs, ArtifactKind::Csv, non_empty(&inputs.csv))?;
        let md = Self::resolve_path(inputs, ArtifactKind::Markdown, non_empty(&inputs.md))?;

        let push_to = if push {
            let repository = non_empty(&inputs.repository).ok_or_else(|| {
                Error::Config(
                    "GITHUB_REPOSITORY must be set to push results to the repository".to_string(),
                )
            })?;
            Some(RepoCoordinates::parse(repository)?)
        } else {
            None
        };

        Ok(Self {
            token,
            scope,
            csv,
            md,
            exclude,
            dedup,
            push_to,
        })
    }

    fn resolve_path(
        inputs: &ActionInputs<'_>,
        kind: ArtifactKind,
        requested: Option<&str>,
    ) -> Result<Option<ReportPath>> {
        let Some(requested) = requested else {
            return Ok(None);
        };
        let workspace = non_empty(&inputs.workspace).ok_or_else(|| {
            Error::Config(format!(
                "GITHUB_WORKSPACE must be set to write the {} report",
                kind.as_str()
            ))
        })?;
        ReportPath::resolve(kind, Path::new(workspace), requested).map(Some)
    }

    /// Bearer credential
    #[inline]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Configured report paths in publish order (CSV first, then Markdown)
    pub fn report_paths(&self) -> impl Iterator<Item = &ReportPath> {
        self.csv.iter().chain(self.md.iter())
    }
}
