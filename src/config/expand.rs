//! Environment variable expansion.
//!
//! Walks every string leaf of a document and substitutes `${NAME}` and
//! `${NAME:-default}` tokens from an injected environment map. The
//! environment is a parameter, never read from the process here, so the
//! stage is a pure function.
//!
//! Expansion is a single pass: substituted text is never re-scanned for
//! further tokens, which rules out injection and recursion loops.

use crate::error::{PipelineError, PipelineResult};
use regex_lite::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;

fn token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}").expect("valid token regex")
    })
}

/// Expand environment tokens in every string leaf of `doc`.
///
/// Mapping keys are never expanded, only values; numeric and boolean leaves
/// are left untouched. An unset variable with no default fails with
/// [`PipelineError::UnresolvedVariable`] naming the variable and the key
/// path of the offending leaf; expansion never silently leaves a raw token
/// nor substitutes an empty string.
pub fn expand(doc: &Value, env: &HashMap<String, String>) -> PipelineResult<Value> {
    expand_value(doc, env, "")
}

fn expand_value(value: &Value, env: &HashMap<String, String>, path: &str) -> PipelineResult<Value> {
    match value {
        Value::Object(map) => {
            let expanded = map
                .iter()
                .map(|(key, val)| {
                    let child = if path.is_empty() {
                        key.clone()
                    } else {
                        format!("{path}.{key}")
                    };
                    Ok((key.clone(), expand_value(val, env, &child)?))
                })
                .collect::<PipelineResult<serde_json::Map<String, Value>>>()?;
            Ok(Value::Object(expanded))
        }
        Value::Array(seq) => {
            let expanded = seq
                .iter()
                .enumerate()
                .map(|(i, val)| expand_value(val, env, &format!("{path}[{i}]")))
                .collect::<PipelineResult<Vec<Value>>>()?;
            Ok(Value::Array(expanded))
        }
        Value::String(s) => Ok(Value::String(expand_string(s, env, path)?)),
        other => Ok(other.clone()),
    }
}

/// Expand all tokens in one string, left-to-right.
fn expand_string(s: &str, env: &HashMap<String, String>, path: &str) -> PipelineResult<String> {
    let mut out = String::with_capacity(s.len());
    let mut last_end = 0;

    for caps in token_regex().captures_iter(s) {
        let whole = caps.get(0).expect("capture 0 always present");
        let name = &caps[1];

        out.push_str(&s[last_end..whole.start()]);
        last_end = whole.end();

        if let Some(value) = env.get(name) {
            out.push_str(value);
        } else if let Some(default) = caps.get(2) {
            // Literal default text, no recursive expansion
            out.push_str(default.as_str());
        } else {
            return Err(PipelineError::UnresolvedVariable {
                name: name.to_string(),
                path: path.to_string(),
            });
        }
    }

    out.push_str(&s[last_end..]);
    Ok(out)
}
