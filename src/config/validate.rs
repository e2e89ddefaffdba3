//! Schema and compatibility validation.
//!
//! Structural checks run on the raw document and are batched: every
//! violation is collected before reporting, so one edit cycle fixes all of
//! them. Live checks call out to an injected tool-discovery collaborator:
//! the availability probe runs in both modes (an agent must never claim a
//! non-optional skill it cannot reach), while the cached-schema drift
//! comparison runs only in strict mode.

use super::types::{AgentConfig, SkillEntry};
use crate::error::{PipelineError, PipelineResult, SkillWarning, Violation};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, warn};

/// Validation strictness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Trust cached schemas as-is; only structural and availability checks.
    #[default]
    Lenient,
    /// Additionally compare cached schema snapshots against live schemas.
    Strict,
}

/// Result of asking the tool-discovery collaborator for a skill's schemas.
#[derive(Debug, Clone)]
pub enum SchemaFetch {
    Available {
        input_schema: Option<Value>,
        output_schema: Option<Value>,
    },
    Unavailable,
}

/// Capability exposed by the excluded tool-integration layer.
///
/// The pipeline never constructs this itself; callers that want live checks
/// inject an implementation backed by their MCP transport.
#[async_trait]
pub trait SchemaFetcher: Send + Sync {
    async fn fetch_schema(&self, skill: &SkillEntry) -> SchemaFetch;
}

const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Document validator.
pub struct Validator<'a> {
    mode: ValidationMode,
    fetcher: Option<&'a dyn SchemaFetcher>,
    fetch_timeout: Duration,
}

impl<'a> Validator<'a> {
    pub fn new(mode: ValidationMode) -> Self {
        Self {
            mode,
            fetcher: None,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// Attach the tool-discovery collaborator. Without one, live checks are
    /// skipped entirely (offline validation).
    pub fn with_fetcher(mut self, fetcher: &'a dyn SchemaFetcher) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Timeout applied to each schema fetch; a timed-out fetch is treated
    /// the same as an unreachable endpoint.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Validate a resolved document and decode it.
    ///
    /// Returns the typed configuration and any degraded-skill warnings, or
    /// the first fatal error per the pipeline's propagation policy.
    pub async fn validate(
        &self,
        doc: &Value,
    ) -> PipelineResult<(AgentConfig, Vec<SkillWarning>)> {
        let violations = check_structure(doc);
        if !violations.is_empty() {
            return Err(PipelineError::SchemaViolations(violations));
        }

        let config = AgentConfig::from_document(doc)?;
        let warnings = self.check_live(&config).await?;
        Ok((config, warnings))
    }

    /// Availability probe for every skill, plus drift comparison in strict
    /// mode. Fetches run sequentially; order carries no meaning.
    async fn check_live(&self, config: &AgentConfig) -> PipelineResult<Vec<SkillWarning>> {
        let Some(fetcher) = self.fetcher else {
            debug!("No schema fetcher supplied; skipping live checks");
            return Ok(Vec::new());
        };

        let mut warnings = Vec::new();

        for skill in &config.agent_card.skills {
            let fetched =
                match tokio::time::timeout(self.fetch_timeout, fetcher.fetch_schema(skill)).await {
                    Ok(fetched) => fetched,
                    Err(_) => {
                        debug!(skill = %skill.id, "Schema fetch timed out");
                        SchemaFetch::Unavailable
                    }
                };

            match fetched {
                SchemaFetch::Unavailable => {
                    if skill.optional {
                        warn!(skill = %skill.id, "Optional skill unavailable; continuing without it");
                        warnings.push(SkillWarning {
                            skill_id: skill.id.clone(),
                            message: "optional skill endpoint is unreachable".to_string(),
                        });
                    } else {
                        return Err(PipelineError::RequiredSkillUnavailable(skill.id.clone()));
                    }
                }
                SchemaFetch::Available {
                    input_schema,
                    output_schema,
                } => {
                    if self.mode == ValidationMode::Strict {
                        check_drift(skill, &skill.input_schema, &input_schema)?;
                        check_drift(skill, &skill.output_schema, &output_schema)?;
                    }
                }
            }
        }

        Ok(warnings)
    }
}

/// Compare a cached schema snapshot against the live schema.
///
/// Only skills carrying a cached snapshot participate; equality is the
/// structural equality of the value trees, which ignores mapping key order.
fn check_drift(
    skill: &SkillEntry,
    cached: &Option<Value>,
    live: &Option<Value>,
) -> PipelineResult<()> {
    let Some(cached) = cached else {
        return Ok(());
    };
    if live.as_ref() != Some(cached) {
        return Err(PipelineError::SchemaDrift {
            skill_id: skill.id.clone(),
            cached: cached.clone(),
            live: live.clone().unwrap_or(Value::Null),
        });
    }
    Ok(())
}

/// Structural checks, both modes. Collects every violation instead of
/// stopping at the first.
pub fn check_structure(doc: &Value) -> Vec<Violation> {
    let mut violations = Vec::new();

    let card = doc.get("agent_card");
    match card {
        None => violations.push(Violation::new("agent_card", "required section is missing")),
        Some(card) if !card.is_object() => {
            violations.push(Violation::new("agent_card", "must be a mapping"));
        }
        Some(card) => {
            match card.get("name").and_then(Value::as_str) {
                Some(name) if !name.trim().is_empty() => {}
                Some(_) => violations.push(Violation::new("agent_card.name", "must not be empty")),
                None => violations.push(Violation::new(
                    "agent_card.name",
                    "required field is missing",
                )),
            }

            match card.get("skills") {
                None => violations.push(Violation::new(
                    "agent_card.skills",
                    "required field is missing",
                )),
                Some(Value::Array(skills)) => check_skills(skills, &mut violations),
                Some(_) => {
                    violations.push(Violation::new("agent_card.skills", "must be a sequence"));
                }
            }
        }
    }

    if let Some(deployment) = doc.get("deployment") {
        if !deployment.is_object() {
            violations.push(Violation::new("deployment", "must be a mapping"));
        } else if deployment
            .get("llm")
            .and_then(|llm| llm.get("model"))
            .and_then(Value::as_str)
            .filter(|m| !m.trim().is_empty())
            .is_none()
        {
            violations.push(Violation::new(
                "deployment.llm.model",
                "required field is missing",
            ));
        }
    }

    violations
}

fn check_skills(skills: &[Value], violations: &mut Vec<Violation>) {
    let mut seen_ids: HashSet<&str> = HashSet::new();

    for (i, skill) in skills.iter().enumerate() {
        let path = format!("agent_card.skills[{i}]");

        if !skill.is_object() {
            violations.push(Violation::new(path, "skill entry must be a mapping"));
            continue;
        }

        match skill.get("id").and_then(Value::as_str) {
            Some(id) if !id.trim().is_empty() => {
                if !seen_ids.insert(id) {
                    violations.push(Violation::new(
                        format!("{path}.id"),
                        format!("duplicate skill id '{id}'"),
                    ));
                }
            }
            Some(_) => violations.push(Violation::new(format!("{path}.id"), "must not be empty")),
            None => violations.push(Violation::new(
                format!("{path}.id"),
                "required field is missing",
            )),
        }

        // Shape is required even for optional skills; only runtime
        // reachability is allowed to degrade.
        match skill.get("mcp_config") {
            Some(cfg) if cfg.is_object() => {}
            Some(_) => violations.push(Violation::new(
                format!("{path}.mcp_config"),
                "must be a mapping",
            )),
            None => violations.push(Violation::new(
                format!("{path}.mcp_config"),
                "required field is missing",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_doc() -> Value {
        json!({
            "agent_card": {
                "name": "Test Agent",
                "skills": [{
                    "id": "mcp_tool1",
                    "name": "tool1",
                    "mcp_config": {"transport": "stdio", "command": "tool1"}
                }]
            },
            "deployment": {"llm": {"model": "claude-3-5-sonnet-20241022"}}
        })
    }

    #[test]
    fn test_valid_document_has_no_violations() {
        assert!(check_structure(&valid_doc()).is_empty());
    }

    #[test]
    fn test_violations_are_batched() {
        // Missing name AND empty skill id: both reported at once.
        let doc = json!({
            "agent_card": {
                "skills": [{"id": "", "mcp_config": {"transport": "stdio", "command": "x"}}]
            }
        });
        let violations = check_structure(&doc);
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].path, "agent_card.name");
        assert_eq!(violations[1].path, "agent_card.skills[0].id");
    }

    #[test]
    fn test_missing_mcp_config_flagged() {
        let doc = json!({
            "agent_card": {"name": "A", "skills": [{"id": "mcp_a", "optional": true}]}
        });
        let violations = check_structure(&doc);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "agent_card.skills[0].mcp_config");
    }

    #[test]
    fn test_duplicate_skill_ids_flagged() {
        let doc = json!({
            "agent_card": {
                "name": "A",
                "skills": [
                    {"id": "mcp_a", "mcp_config": {"transport": "stdio", "command": "a"}},
                    {"id": "mcp_a", "mcp_config": {"transport": "stdio", "command": "b"}}
                ]
            }
        });
        let violations = check_structure(&doc);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].reason.contains("duplicate"));
    }

    #[test]
    fn test_deployment_requires_model() {
        let doc = json!({
            "agent_card": {"name": "A", "skills": []},
            "deployment": {"llm": {"temperature": 0.5}}
        });
        let violations = check_structure(&doc);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "deployment.llm.model");
    }

    #[test]
    fn test_absent_deployment_is_fine() {
        let doc = json!({"agent_card": {"name": "A", "skills": []}});
        assert!(check_structure(&doc).is_empty());
    }

    #[tokio::test]
    async fn test_validate_without_fetcher_is_structural_only() {
        let validator = Validator::new(ValidationMode::Strict);
        let (config, warnings) = validator.validate(&valid_doc()).await.unwrap();
        assert_eq!(config.agent_card.name, "Test Agent");
        assert!(warnings.is_empty());
    }

    #[tokio::test]
    async fn test_validate_reports_all_structural_violations() {
        let doc = json!({"agent_card": {"skills": [{"id": ""}]}});
        let err = Validator::new(ValidationMode::Lenient)
            .validate(&doc)
            .await
            .unwrap_err();
        // empty id + missing name + missing mcp_config
        assert_eq!(err.violations().len(), 3);
    }
}
