//! Report generator backed by an external scanner executable
//!
//! The scanner does the repository traversal. Contract:
//! - arguments: `--enterprise <slug>` or `--owner <login>`, plus `--exclude`
//! - credential: `GITHUB_TOKEN` environment variable, never an argument
//! - stdout: JSON array of `{"repository","workflow","uses"}` records

use crate::config::ActionConfig;
use crate::error::{Error, Result};
use crate::output::{csv, markdown};
use crate::traits::ReportGenerator;
use crate::types::{ActionUse, DedupMode, Rendition, Scope, UsageReport};
use std::future::Future;
use std::process::Stdio;

/// Scanner executable used when none is configured
pub const DEFAULT_SCANNER: &str = "action-uses-scanner";

/// Runs the scanner as a child process and renders its records
pub struct ProcessReportGenerator {
    program: String,
    token: String,
    scope: Scope,
    exclude: bool,
}

impl std::fmt::Debug for ProcessReportGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessReportGenerator")
            .field("program", &self.program)
            .field("token", &"<redacted>")
            .field("scope", &self.scope)
            .field("exclude", &self.exclude)
            .finish()
    }
}

impl ProcessReportGenerator {
    /// Create a generator for `scope`
    pub fn new(
        program: impl Into<String>,
        token: impl Into<String>,
        scope: Scope,
        exclude: bool,
    ) -> Self {
        Self {
            program: program.into(),
            token: token.into(),
            scope,
            exclude,
        }
    }

    /// Create a generator from validated action configuration
    pub fn from_config(program: impl Into<String>, config: &ActionConfig) -> Self {
        Self::new(program, config.token(), config.scope.clone(), config.exclude)
    }

    /// Arguments passed to the scanner
    pub fn args(&self) -> Vec<&str> {
        let mut args = self.scope.as_args().to_vec();
        if self.exclude {
            args.push("--exclude");
        }
        args
    }

    async fn run_scanner(&self) -> Result<Vec<ActionUse>> {
        tracing::info!(program = %self.program, scope = ?self.scope, "running scanner");

        let output = tokio::process::Command::new(&self.program)
            .args(self.args())
            .env("GITHUB_TOKEN", &self.token)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| Error::Generator(format!("Failed to run {}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Generator(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        parse_records(&output.stdout)
    }
}

/// Parse scanner stdout
pub fn parse_records(stdout: &[u8]) -> Result<Vec<ActionUse>> {
    serde_json::from_slice(stdout)
        .map_err(|e| Error::Generator(format!("Invalid scanner output: {}", e)))
}

impl ReportGenerator for ProcessReportGenerator {
    fn action_uses(&self, mode: DedupMode) -> impl Future<Output = Result<UsageReport>> + Send {
        async move {
            let actions = self.run_scanner().await?;
            tracing::info!(count = actions.len(), "collected action usages");
            Ok(UsageReport::new(actions, mode))
        }
    }

    fn render_csv(&self, report: &UsageReport, mode: DedupMode) -> Result<Option<Rendition>> {
        Ok(Rendition::build(
            report,
            mode,
            csv::render_actions,
            csv::render_unique,
        ))
    }

    fn render_markdown(
        &self,
        report: &UsageReport,
        mode: DedupMode,
    ) -> Result<Option<Rendition>> {
        Ok(Rendition::build(
            report,
            mode,
            markdown::render_actions,
            markdown::render_unique,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn generator(exclude: bool) -> ProcessReportGenerator {
        ProcessReportGenerator::new("scanner", "ghs_x", Scope::Owner("octo".into()), exclude)
    }

    #[test]
    fn test_args() {
        assert_eq!(generator(false).args(), vec!["--owner", "octo"]);
        assert_eq!(generator(true).args(), vec!["--owner", "octo", "--exclude"]);
    }

    #[test]
    fn test_args_never_contain_token() {
        assert!(!generator(true).args().contains(&"ghs_x"));
        assert!(!format!("{:?}", generator(true)).contains("ghs_x"));
    }

    #[test]
    fn test_parse_records() {
        let json = br#"[{"repository":"octo/app","workflow":".github/workflows/ci.yml","uses":"actions/checkout@v4"}]"#;
        let records = parse_records(json).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].uses, "actions/checkout@v4");
    }

    #[test]
    fn test_parse_records_invalid() {
        assert_matches!(parse_records(b"not json"), Err(Error::Generator(_)));
    }

    #[test]
    fn test_render_csv_both() {
        let report = UsageReport::new(
            parse_records(
                br#"[{"repository":"o/a","workflow":"w.yml","uses":"x/y@v1"},
                    {"repository":"o/b","workflow":"w.yml","uses":"x/y@v1"}]"#,
            )
            .unwrap(),
            DedupMode::Both,
        );
        let rendition = generator(false)
            .render_csv(&report, DedupMode::Both)
            .unwrap()
            .unwrap();
        assert_eq!(
            rendition.primary,
            "repository,workflow,action\no/a,w.yml,x/y@v1\no/b,w.yml,x/y@v1\n"
        );
        assert_eq!(rendition.unique.as_deref(), Some("action\nx/y@v1\n"));
    }

    #[test]
    fn test_render_empty_is_none() {
        let report = UsageReport::default();
        assert!(generator(false)
            .render_markdown(&report, DedupMode::Off)
            .unwrap()
            .is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_missing_scanner_is_generator_error() {
        let g = ProcessReportGenerator::new(
            "/nonexistent/action-uses-scanner",
            "t",
            Scope::Owner("octo".into()),
            false,
        );
        assert_matches!(g.action_uses(DedupMode::Off).await, Err(Error::Generator(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_scanner_failure_is_generator_error() {
        let g = ProcessReportGenerator::new("false", "t", Scope::Owner("octo".into()), false);
        assert_matches!(g.action_uses(DedupMode::Off).await, Err(Error::Generator(_)));
    }
}
