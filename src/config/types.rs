//! Typed configuration records.
//!
//! The pipeline works on untyped document trees through merge and expansion;
//! only after structural validation succeeds is the document decoded once
//! into these records. That keeps "maybe this key exists" checks at a single
//! validate-then-decode boundary instead of scattered through consumers.

use crate::error::{PipelineError, PipelineResult, Violation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Complete agent configuration: public card plus private deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub agent_card: AgentCard,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment: Option<DeploymentConfig>,
}

impl AgentConfig {
    /// Decode a resolved document.
    ///
    /// Call only after structural validation has passed; a decode failure
    /// here still surfaces as a violation rather than a panic.
    pub fn from_document(doc: &Value) -> PipelineResult<Self> {
        serde_json::from_value(doc.clone()).map_err(|e| {
            PipelineError::SchemaViolations(vec![Violation::new("", e.to_string())])
        })
    }
}

/// Public-facing agent description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentCard {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<Capabilities>,
    #[serde(
        default,
        rename = "defaultInputModes",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub default_input_modes: Vec<String>,
    #[serde(
        default,
        rename = "defaultOutputModes",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub default_output_modes: Vec<String>,
    #[serde(default)]
    pub skills: Vec<SkillEntry>,
}

/// Capability flags advertised on the agent card.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Capabilities {
    #[serde(default)]
    pub streaming: bool,
    #[serde(default, rename = "pushNotifications")]
    pub push_notifications: bool,
    #[serde(default, rename = "stateTransitionHistory")]
    pub state_transition_history: bool,
}

/// One skill on the agent card, backed by an MCP tool endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillEntry {
    /// Unique within the document's skill list.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// How to reach the tool endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mcp_config: Option<McpConfig>,
    /// Cached JSON-Schema snapshot from a prior discovery run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<Value>,
    /// If true, the skill being unreachable at runtime is non-fatal.
    #[serde(default)]
    pub optional: bool,
}

/// Transport configuration for an MCP tool endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "transport", rename_all = "snake_case")]
pub enum McpConfig {
    /// Local process over stdio.
    Stdio {
        command: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        args: Vec<String>,
        #[serde(default, skip_serializing_if = "HashMap::is_empty")]
        env: HashMap<String, String>,
    },
    /// Remote endpoint over streamable HTTP.
    Http {
        url: String,
        #[serde(default, skip_serializing_if = "HashMap::is_empty")]
        headers: HashMap<String, String>,
    },
    /// Remote endpoint over server-sent events.
    Sse {
        url: String,
        #[serde(default, skip_serializing_if = "HashMap::is_empty")]
        headers: HashMap<String, String>,
    },
}

/// Private runtime parameters, never exposed on the public card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentConfig {
    pub llm: LlmConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceConfig>,
}

/// Model selection and sampling parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

fn default_temperature() -> f64 {
    0.7
}

/// Serverless resource sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceConfig {
    #[serde(default = "default_cpu")]
    pub cpu: f64,
    #[serde(default = "default_memory_mb")]
    pub memory_mb: u32,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default)]
    pub keep_warm: u32,
}

fn default_cpu() -> f64 {
    1.0
}

fn default_memory_mb() -> u32 {
    2048
}

fn default_timeout_seconds() -> u64 {
    300
}
