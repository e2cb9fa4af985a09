//! Response extraction — turns raw model output into a candidate JSON value.
//!
//! Extraction is purely syntactic; schema checks live in `validator` so each
//! half can be tested on its own.

use serde_json::Value;
use thiserror::Error;

/// Why a raw response could not be turned into a candidate value.
#[derive(Debug, Error, PartialEq)]
pub enum NotParseable {
    #[error("empty response")]
    Empty,

    #[error("malformed JSON: {0}")]
    MalformedJson(String),
}

/// Parses raw generation output into a candidate value.
///
/// Accepts plain JSON text or JSON wrapped in a markdown code fence. Fence
/// markers are stripped only at the very start and end of the trimmed text;
/// fence-like substrings inside the payload are left alone.
pub fn extract_candidate(raw: Option<&str>) -> Result<Value, NotParseable> {
    let text = raw
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(NotParseable::Empty)?;

    let text = strip_outer_fences(text);

    serde_json::from_str(text).map_err(|e| NotParseable::MalformedJson(e.to_string()))
}

/// Strips a leading ```json or ``` fence and its matching trailing fence.
fn strip_outer_fences(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.trim_start();

    match rest.strip_suffix("```") {
        Some(inner) => inner.trim(),
        None => rest.trim_end(),
    }
}
