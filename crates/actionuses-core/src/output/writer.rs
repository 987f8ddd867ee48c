//! Action output sinks

use crate::error::Result;
use crate::traits::OutputSink;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

const DELIMITER_BASE: &str = "ACTION_USES_EOF";

/// Pick a heredoc delimiter that does not occur as a line of `value`
pub fn heredoc_delimiter(value: &str) -> String {
    let collides = |delim: &str| value.lines().any(|line| line == delim);

    let mut delim = DELIMITER_BASE.to_string();
    let mut n = 0u32;
    while collides(&delim) {
        n += 1;
        delim = format!("{}_{}", DELIMITER_BASE, n);
    }
    delim
}

/// Format one output in `$GITHUB_OUTPUT` multiline syntax
pub fn format_output(name: &str, value: &str) -> String {
    let delim = heredoc_delimiter(value);
    let mut entry = String::with_capacity(name.len() + value.len() + delim.len() * 2 + 8);
    entry.push_str(name);
    entry.push_str("<<");
    entry.push_str(&delim);
    entry.push('\n');
    entry.push_str(value);
    // The runner drops the line break before the closing delimiter
    entry.push('\n');
    entry.push_str(&delim);
    entry.push('\n');
    entry
}

/// Appends outputs to the file named by `$GITHUB_OUTPUT`
#[derive(Debug, Clone)]
pub struct GitHubOutputFile {
    path: PathBuf,
}

impl GitHubOutputFile {
    /// Write outputs to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Output file location
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputSink for GitHubOutputFile {
    fn set_output(&mut self, name: &str, value: &str) -> Result<()> {
        let mut f = std::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        f.write_all(format_output(name, value).as_bytes())?;
        Ok(())
    }
}

/// Collects outputs in memory; used when no output file is available
#[derive(Debug, Clone, Default)]
pub struct MemoryOutputs {
    values: BTreeMap<String, String>,
}

impl MemoryOutputs {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an output
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Number of outputs set
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no output was set
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All outputs as a JSON object
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                .collect(),
        )
    }
}

impl OutputSink for MemoryOutputs {
    fn set_output(&mut self, name: &str, value: &str) -> Result<()> {
        self.values.insert(name.to_string(), value.to_string());
        Ok(())
    }
}
