//! Configuration document loader.
//!
//! Reads base documents and override fragments from disk. The loader has no
//! side effects beyond the read and performs no merging or validation; a
//! missing file and a file that does not parse to a mapping are the only
//! failure modes.

use super::document::{self, DocumentFormat};
use crate::error::{PipelineError, PipelineResult};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Load a base configuration document.
pub fn load_document(path: &Path) -> PipelineResult<Value> {
    let content = read_file(path)?;
    let doc = document::parse_document(path, &content)?;
    debug!(path = %path.display(), "Loaded configuration document");
    Ok(doc)
}

/// Load an ordered sequence of override fragments from a structured file.
///
/// The file contains either a single mapping (one fragment) or a top-level
/// sequence of mappings (applied in order). Anything else is malformed.
pub fn load_overrides(path: &Path) -> PipelineResult<Vec<Value>> {
    let content = read_file(path)?;

    let value: Value = match DocumentFormat::from_path(path) {
        DocumentFormat::Json => {
            serde_json::from_str(&content).map_err(|e| PipelineError::malformed(path, e))?
        }
        DocumentFormat::Yaml => {
            serde_yaml::from_str(&content).map_err(|e| PipelineError::malformed(path, e))?
        }
    };

    let fragments = match value {
        Value::Object(_) => vec![value],
        Value::Array(entries) => {
            if let Some(bad) = entries.iter().find(|e| !e.is_object()) {
                return Err(PipelineError::malformed(
                    path,
                    format!("override sequence entry is not a mapping: {bad}"),
                ));
            }
            entries
        }
        _ => {
            return Err(PipelineError::malformed(
                path,
                "overrides must be a mapping or a sequence of mappings",
            ));
        }
    };

    debug!(
        path = %path.display(),
        count = fragments.len(),
        "Loaded override fragments"
    );
    Ok(fragments)
}

/// Persist a document in the format implied by the target path.
pub fn save_document(path: &Path, doc: &Value) -> PipelineResult<()> {
    let text = document::serialize_document(doc, DocumentFormat::from_path(path))?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| PipelineError::malformed(path, e))?;
    }
    std::fs::write(path, text).map_err(|e| PipelineError::malformed(path, e))?;
    Ok(())
}

fn read_file(path: &Path) -> PipelineResult<String> {
    if !path.exists() {
        return Err(PipelineError::DocumentNotFound(path.to_path_buf()));
    }
    std::fs::read_to_string(path).map_err(|e| PipelineError::malformed(path, e))
}
