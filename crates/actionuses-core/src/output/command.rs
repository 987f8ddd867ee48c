//! GitHub Actions workflow command formatting

/// Escape command data (percent-encoding `%`, CR and LF)
pub fn escape_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Format an `::error::` command that marks the step failed in the job log
pub fn error_command(message: &str) -> String {
    format!("::error::{}", escape_data(message))
}
