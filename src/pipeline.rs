//! Pipeline orchestration: load, merge, expand, validate.
//!
//! Each invocation constructs and discards its own document tree; there is
//! no cache or shared state between runs. The stages run strictly in
//! sequence because each stage's output is the next stage's entire input.

use crate::config::{
    self, AgentConfig, SchemaFetcher, ValidationMode, Validator, deep_merge_all, expand,
    load_document, load_overrides, parse_assignment, public_view,
};
use crate::error::{PipelineResult, SkillWarning};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Output of a successful pipeline run.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The fully merged, expanded, validated document.
    pub document: Value,
    /// Typed view decoded at the validation boundary.
    pub config: AgentConfig,
    /// Degraded optional skills recorded during validation.
    pub warnings: Vec<SkillWarning>,
}

impl ResolvedConfig {
    /// The externally exposed agent description, with the private
    /// `deployment` sub-tree removed.
    pub fn public_card(&self) -> Value {
        public_view(&self.document)
    }
}

/// Configuration pipeline builder.
///
/// Override precedence, lowest to highest: base document, overrides-file
/// fragments in file order, `--set` assignments in argument order.
pub struct Pipeline {
    base_path: PathBuf,
    overrides_path: Option<PathBuf>,
    assignments: Vec<String>,
    env: HashMap<String, String>,
    mode: ValidationMode,
    fetch_timeout: Duration,
}

impl Pipeline {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            overrides_path: None,
            assignments: Vec::new(),
            env: HashMap::new(),
            mode: ValidationMode::default(),
            fetch_timeout: Duration::from_secs(10),
        }
    }

    /// Structured overrides file applied after the base document.
    pub fn with_overrides_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.overrides_path = Some(path.into());
        self
    }

    /// Add one `path.to.key=value` assignment; applied after the overrides
    /// file, in the order given.
    pub fn with_assignment(mut self, assignment: impl Into<String>) -> Self {
        self.assignments.push(assignment.into());
        self
    }

    /// Environment for `${VAR}` expansion. Injected rather than read from
    /// the process so runs are reproducible and testable.
    pub fn with_env(mut self, env: HashMap<String, String>) -> Self {
        self.env = env;
        self
    }

    pub fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Timeout for each live schema fetch during validation.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Run the pipeline. `fetcher` is the tool-discovery collaborator;
    /// without one, validation is structural only.
    pub async fn resolve(
        &self,
        fetcher: Option<&dyn SchemaFetcher>,
    ) -> PipelineResult<ResolvedConfig> {
        let base = load_document(&self.base_path)?;

        let mut fragments = match &self.overrides_path {
            Some(path) => load_overrides(path)?,
            None => Vec::new(),
        };
        for assignment in &self.assignments {
            fragments.push(parse_assignment(assignment)?);
        }

        debug!(
            base = %self.base_path.display(),
            fragments = fragments.len(),
            "Merging configuration"
        );
        let merged = deep_merge_all(base, fragments);
        let expanded = expand(&merged, &self.env)?;

        let mut validator =
            Validator::new(self.mode).with_fetch_timeout(self.fetch_timeout);
        if let Some(fetcher) = fetcher {
            validator = validator.with_fetcher(fetcher);
        }
        let (config, warnings) = validator.validate(&expanded).await?;

        debug!(
            agent = %config.agent_card.name,
            skills = config.agent_card.skills.len(),
            warnings = warnings.len(),
            "Configuration resolved"
        );
        Ok(ResolvedConfig {
            document: expanded,
            config,
            warnings,
        })
    }

    /// Persist a resolved document in the format implied by the target path.
    pub fn save(document: &Value, path: &Path) -> PipelineResult<()> {
        config::save_document(path, document)
    }
}
