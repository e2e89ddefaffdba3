//! Document format handling.
//!
//! Configuration documents are UTF-8 text in either JSON or YAML; both parse
//! into the same `serde_json::Value` tree and serialize back without loss,
//! so the merge/expand stages never care which format a document came from.

use crate::error::{PipelineError, PipelineResult};
use serde_json::Value;
use std::path::Path;

/// On-disk format of a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
    #[default]
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Infer the format from a file extension. `.yaml`/`.yml` are YAML,
    /// everything else is treated as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// Parse document text into a value tree.
///
/// The top-level value must be a mapping; anything else (including valid
/// JSON/YAML scalars and sequences) is a malformed document.
pub fn parse_document(path: &Path, content: &str) -> PipelineResult<Value> {
    let value: Value = match DocumentFormat::from_path(path) {
        DocumentFormat::Json => {
            serde_json::from_str(content).map_err(|e| PipelineError::malformed(path, e))?
        }
        DocumentFormat::Yaml => {
            serde_yaml::from_str(content).map_err(|e| PipelineError::malformed(path, e))?
        }
    };

    if !value.is_object() {
        return Err(PipelineError::malformed(
            path,
            "top-level value is not a mapping",
        ));
    }

    Ok(value)
}

/// Serialize a document in the given format.
///
/// The output parses back to an identical value tree (round-trip invariant).
pub fn serialize_document(doc: &Value, format: DocumentFormat) -> PipelineResult<String> {
    match format {
        DocumentFormat::Json => {
            let mut out = serde_json::to_string_pretty(doc)
                .map_err(|e| PipelineError::malformed("<serialize>", e))?;
            out.push('\n');
            Ok(out)
        }
        DocumentFormat::Yaml => {
            serde_yaml::to_string(doc).map_err(|e| PipelineError::malformed("<serialize>", e))
        }
    }
}

/// Public agent card view of a resolved document.
///
/// The `deployment` sub-tree holds private runtime parameters (model, system
/// prompt, resource sizing) and must never appear in the externally exposed
/// description.
pub fn public_view(doc: &Value) -> Value {
    let mut card = doc.clone();
    if let Some(map) = card.as_object_mut() {
        map.remove("deployment");
    }
    card
}
