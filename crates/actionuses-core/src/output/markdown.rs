//! Markdown table rendering of usage reports

use crate::types::ActionUse;
use std::borrow::Cow;

/// Escape pipes and flatten line breaks so a value stays in its cell
pub fn escape_cell(cell: &str) -> Cow<'_, str> {
    if cell.contains(['|', '\n', '\r']) {
        Cow::Owned(
            cell.replace('|', "\\|")
                .replace("\r\n", " ")
                .replace(['\n', '\r'], " "),
        )
    } else {
        Cow::Borrowed(cell)
    }
}

/// Render every usage record
pub fn render_actions(actions: &[ActionUse]) -> String {
    let mut buf = String::with_capacity(64 + actions.len() * 72);
    buf.push_str("| repository | workflow | action |\n");
    buf.push_str("| --- | --- | --- |\n");
    for a in actions {
        buf.push_str("| ");
        buf.push_str(&escape_cell(&a.repository));
        buf.push_str(" | ");
        buf.push_str(&escape_cell(&a.workflow));
        buf.push_str(" | ");
        buf.push_str(&escape_cell(&a.uses));
        buf.push_str(" |\n");
    }
    buf
}

/// Render the deduplicated action list
pub fn render_unique(unique: &[String]) -> String {
    let mut buf = String::with_capacity(24 + unique.len() * 36);
    buf.push_str("| action |\n");
    buf.push_str("| --- |\n");
    for uses in unique {
        buf.push_str("| ");
        buf.push_str(&escape_cell(uses));
        buf.push_str(" |\n");
    }
    buf
}
