//! Loading capture messages from disk.

use anyhow::{Context, Result};
use std::path::Path;

use super::har::{har_messages, parse_har};
use super::log::CaptureLog;
use super::message::CaptureMessage;

/// Reads capture messages from `path`.
///
/// `.har` files are imported as HAR 1.2; anything else is read as JSON lines,
/// one [`CaptureMessage`] per non-empty line.
pub fn load_messages(path: &Path) -> Result<Vec<CaptureMessage>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read capture file: {}", path.display()))?;
    let is_har = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("har"));
    let messages = if is_har {
        let har = parse_har(&text).with_context(|| format!("invalid HAR: {}", path.display()))?;
        har_messages(&har)
    } else {
        parse_json_lines(&text).with_context(|| format!("invalid capture log: {}", path.display()))?
    };
    tracing::debug!(path = %path.display(), messages = messages.len(), "loaded capture messages");
    Ok(messages)
}

/// Loads and merges `path` into a [`CaptureLog`].
pub fn load_capture_log(path: &Path) -> Result<CaptureLog> {
    Ok(CaptureLog::from_messages(load_messages(path)?))
}

fn parse_json_lines(text: &str) -> Result<Vec<CaptureMessage>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).with_context(|| format!("line {}", i + 1))
        })
        .collect()
}
