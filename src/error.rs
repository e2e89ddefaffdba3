//! Structured error types for the configuration pipeline.
//!
//! Every fatal condition aborts the pipeline and carries enough context
//! (field path + reason) for the operator to fix the document in one pass.
//! Structural violations are the exception: they are collected and reported
//! together so one edit cycle fixes all of them.

use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

/// One structural problem found during validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// Dot-separated path to the offending field (e.g. `agent_card.skills[2].id`).
    pub path: String,
    /// Human-readable reason.
    pub reason: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

/// Warning recorded when an optional skill degrades instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillWarning {
    pub skill_id: String,
    pub message: String,
}

/// Pipeline error taxonomy.
///
/// Loader errors (`DocumentNotFound`, `MalformedDocument`) abort before the
/// merge stage. `UnresolvedVariable` is first-failure: a missing deployment
/// secret must not be masked by continuing. `SchemaViolations` is batched.
/// `SchemaDrift` only occurs in strict mode; `RequiredSkillUnavailable` is
/// fatal in both modes.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration document not found: {}", .0.display())]
    DocumentNotFound(PathBuf),

    #[error("malformed configuration document {}: {reason}", path.display())]
    MalformedDocument { path: PathBuf, reason: String },

    #[error("invalid override assignment '{0}': expected path.to.key=value")]
    InvalidAssignment(String),

    #[error("unresolved variable ${{{name}}} at {path}")]
    UnresolvedVariable { name: String, path: String },

    #[error("configuration failed validation with {} violation(s)", .0.len())]
    SchemaViolations(Vec<Violation>),

    #[error("cached schema for skill '{skill_id}' no longer matches the live tool")]
    SchemaDrift {
        skill_id: String,
        cached: Value,
        live: Value,
    },

    #[error("required skill '{0}' is unavailable")]
    RequiredSkillUnavailable(String),
}

impl PipelineError {
    /// Convenience constructor for loader parse failures.
    pub fn malformed(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Self::MalformedDocument {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// The violations carried by a `SchemaViolations` error, if any.
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::SchemaViolations(v) => v,
            _ => &[],
        }
    }
}

/// Result type for pipeline operations.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
