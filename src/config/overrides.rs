//! Dot-path override assignments.
//!
//! A `--set path.to.key=value` argument becomes a single-key override
//! fragment equivalent to `{path: {to: {key: value}}}`, merged like any
//! other fragment. Later assignments override earlier ones touching the
//! same path because each is its own merge pass.

use crate::error::{PipelineError, PipelineResult};
use serde_json::Value;

/// Parse a `path.to.key=value` assignment into an override fragment.
pub fn parse_assignment(assignment: &str) -> PipelineResult<Value> {
    let Some((path, raw_value)) = assignment.split_once('=') else {
        return Err(PipelineError::InvalidAssignment(assignment.to_string()));
    };

    let path = path.trim();
    if path.is_empty() || path.split('.').any(|seg| seg.is_empty()) {
        return Err(PipelineError::InvalidAssignment(assignment.to_string()));
    }

    let mut fragment = parse_literal(raw_value);
    for segment in path.rsplit('.') {
        let mut map = serde_json::Map::with_capacity(1);
        map.insert(segment.to_string(), fragment);
        fragment = Value::Object(map);
    }
    Ok(fragment)
}

/// Parse a scalar assignment value.
///
/// The value is parsed as a JSON literal if possible (true/false/null,
/// numbers, quoted strings, arrays, objects); anything that does not parse
/// is kept as a raw string.
pub fn parse_literal(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
