#[cfg(target_env = "musl")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use actionuses_core::generator::DEFAULT_SCANNER;
use actionuses_core::http::DEFAULT_API_URL;
use actionuses_core::output::command::error_command;
use actionuses_core::output::{GitHubOutputFile, MemoryOutputs};
use actionuses_core::{ActionConfig, ActionInputs, RunSummary};
use clap::Parser;
use std::borrow::Cow;
use std::io::Write;
use tracing_subscriber::EnvFilter;

/// Inputs arrive the way the Actions runner passes `with:` values: as
/// `INPUT_<NAME>` environment variables, empty when unset.
#[derive(Parser)]
#[command(
    name = "action-uses",
    version,
    about = "Report GitHub Actions usage and publish it to a repository"
)]
struct Cli {
    /// Token used for the scan and for publishing
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Enterprise to scan (mutually exclusive with --owner)
    #[arg(long, env = "INPUT_ENTERPRISE")]
    enterprise: Option<String>,

    /// Organization or user to scan (mutually exclusive with --enterprise)
    #[arg(long, env = "INPUT_OWNER")]
    owner: Option<String>,

    /// CSV report path, relative to the workspace
    #[arg(long, env = "INPUT_CSV")]
    csv: Option<String>,

    /// Markdown report path, relative to the workspace
    #[arg(long, env = "INPUT_MD")]
    md: Option<String>,

    /// Exclude flag passed to the scanner: true or false
    #[arg(long, env = "INPUT_EXCLUDE")]
    exclude: Option<String>,

    /// Deduplication: true, false, or both
    #[arg(long, env = "INPUT_UNIQUE")]
    unique: Option<String>,

    /// Commit the reports to the current repository: true or false
    #[arg(long, env = "INPUT_PUSH_RESULTS_TO_REPO")]
    push_results_to_repo: Option<String>,

    /// Scanner executable producing the usage records
    #[arg(long, env = "INPUT_SCANNER")]
    scanner: Option<String>,

    /// Workspace root that report paths must stay inside
    #[arg(long, env = "GITHUB_WORKSPACE")]
    workspace: Option<String>,

    /// Repository receiving the reports (owner/repo)
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: Option<String>,

    /// GitHub API root
    #[arg(long, env = "GITHUB_API_URL")]
    api_url: Option<String>,

    /// Output file (default: JSON on stdout)
    #[arg(long, env = "GITHUB_OUTPUT")]
    output_file: Option<String>,
}

/// Filter empty string from Option (the runner sets "" for unset inputs)
fn clean_opt(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.trim().is_empty())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("ACTION_USES_LOG")
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .try_init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let code = match run(&cli) {
        Ok(summary) => {
            tracing::debug!(?summary, "run finished");
            0
        }
        Err(e) => {
            // The one failure message of the run
            println!("{}", error_command(&e.to_string()));
            1
        }
    };
    std::process::exit(code);
}

fn run(cli: &Cli) -> actionuses_core::Result<RunSummary> {
    let inputs = ActionInputs {
        token: clean_opt(&cli.token).map(Cow::Borrowed),
        enterprise: clean_opt(&cli.enterprise).map(Cow::Borrowed),
        owner: clean_opt(&cli.owner).map(Cow::Borrowed),
        csv: clean_opt(&cli.csv).map(Cow::Borrowed),
        md: clean_opt(&cli.md).map(Cow::Borrowed),
        exclude: clean_opt(&cli.exclude).map(Cow::Borrowed),
        unique: clean_opt(&cli.unique).map(Cow::Borrowed),
        push_results_to_repo: clean_opt(&cli.push_results_to_repo).map(Cow::Borrowed),
        workspace: clean_opt(&cli.workspace).map(Cow::Borrowed),
        repository: clean_opt(&cli.repository).map(Cow::Borrowed),
    };

    let config = ActionConfig::from_inputs(&inputs)?;
    tracing::debug!(?config, "validated inputs");

    let scanner = clean_opt(&cli.scanner).unwrap_or(DEFAULT_SCANNER);
    let api_url = clean_opt(&cli.api_url).unwrap_or(DEFAULT_API_URL);

    match clean_opt(&cli.output_file) {
        Some(path) => {
            let mut outputs = GitHubOutputFile::new(path);
            actionuses_core::scan_and_publish_sync(&config, scanner, api_url, &mut outputs)
        }
        None => {
            tracing::warn!("GITHUB_OUTPUT not set, writing outputs to stdout");
            let mut outputs = MemoryOutputs::new();
            let summary =
                actionuses_core::scan_and_publish_sync(&config, scanner, api_url, &mut outputs)?;

            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            serde_json::to_writer(&mut lock, &outputs.to_json())?;
            writeln!(lock)?;
            Ok(summary)
        }
    }
}
