//! CSV rendering of usage reports

use crate::types::ActionUse;
use std::borrow::Cow;

/// Header row of the full usage table
pub const ACTIONS_HEADER: &str = "repository,workflow,action";

/// Header row of the unique action table
pub const UNIQUE_HEADER: &str = "action";

/// Quote a field when it contains a delimiter, quote or line break (RFC 4180)
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Render every usage record
pub fn render_actions(actions: &[ActionUse]) -> String {
    let mut buf = String::with_capacity(ACTIONS_HEADER.len() + 1 + actions.len() * 64);
    buf.push_str(ACTIONS_HEADER);
    buf.push('\n');
    for a in actions {
        buf.push_str(&escape_field(&a.repository));
        buf.push(',');
        buf.push_str(&escape_field(&a.workflow));
        buf.push(',');
        buf.push_str(&escape_field(&a.uses));
        buf.push('\n');
    }
    buf
}

/// Render the deduplicated action list
pub fn render_unique(unique: &[String]) -> String {
    let mut buf = String::with_capacity(UNIQUE_HEADER.len() + 1 + unique.len() * 32);
    buf.push_str(UNIQUE_HEADER);
    buf.push('\n');
    for uses in unique {
        buf.push_str(&escape_field(uses));
        buf.push('\n');
    }
    buf
}
