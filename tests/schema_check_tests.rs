//! Integration tests for live schema checks: availability probing,
//! strict-mode drift detection, and the required-skill gate.

use agent_forge::config::{SchemaFetch, SchemaFetcher, SkillEntry, ValidationMode, Validator};
use agent_forge::error::PipelineError;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::time::Duration;

/// Fetcher backed by a fixed map of skill id -> fetch result. Skills not in
/// the map are reported unavailable.
struct MapFetcher {
    responses: HashMap<String, SchemaFetch>,
}

impl MapFetcher {
    fn new() -> Self {
        Self {
            responses: HashMap::new(),
        }
    }

    fn available(mut self, id: &str, input: Option<Value>, output: Option<Value>) -> Self {
        self.responses.insert(
            id.to_string(),
            SchemaFetch::Available {
                input_schema: input,
                output_schema: output,
            },
        );
        self
    }
}

#[async_trait]
impl SchemaFetcher for MapFetcher {
    async fn fetch_schema(&self, skill: &SkillEntry) -> SchemaFetch {
        self.responses
            .get(&skill.id)
            .cloned()
            .unwrap_or(SchemaFetch::Unavailable)
    }
}

/// Fetcher that never answers; exercises the per-fetch timeout.
struct StalledFetcher;

#[async_trait]
impl SchemaFetcher for StalledFetcher {
    async fn fetch_schema(&self, _skill: &SkillEntry) -> SchemaFetch {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        SchemaFetch::Unavailable
    }
}

fn weather_schema() -> Value {
    json!({
        "type": "object",
        "properties": {"location": {"type": "string"}},
        "required": ["location"]
    })
}

fn doc_with_cached_schema(optional: bool) -> Value {
    json!({
        "agent_card": {
            "name": "Weather Agent",
            "skills": [{
                "id": "mcp_weather",
                "name": "weather",
                "mcp_config": {"transport": "http", "url": "http://localhost:8000/mcp"},
                "input_schema": weather_schema(),
                "optional": optional
            }]
        }
    })
}

#[tokio::test]
async fn strict_mode_accepts_matching_schema() {
    // Live schema has the same structure with keys in a different order;
    // comparison is key-order-insensitive.
    let live = json!({
        "required": ["location"],
        "properties": {"location": {"type": "string"}},
        "type": "object"
    });
    let fetcher = MapFetcher::new().available("mcp_weather", Some(live), None);

    let (_, warnings) = Validator::new(ValidationMode::Strict)
        .with_fetcher(&fetcher)
        .validate(&doc_with_cached_schema(false))
        .await
        .unwrap();
    assert!(warnings.is_empty());
}

#[tokio::test]
async fn strict_mode_detects_input_schema_drift() {
    // Live schema grew an extra required property.
    let live = json!({
        "type": "object",
        "properties": {
            "location": {"type": "string"},
            "units": {"type": "string"}
        },
        "required": ["location", "units"]
    });
    let fetcher = MapFetcher::new().available("mcp_weather", Some(live.clone()), None);

    let err = Validator::new(ValidationMode::Strict)
        .with_fetcher(&fetcher)
        .validate(&doc_with_cached_schema(false))
        .await
        .unwrap_err();

    match err {
        PipelineError::SchemaDrift {
            skill_id,
            cached,
            live: reported,
        } => {
            assert_eq!(skill_id, "mcp_weather");
            assert_eq!(cached, weather_schema());
            assert_eq!(reported, live);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn lenient_mode_trusts_cached_schemas() {
    // Identical drift scenario passes in lenient mode.
    let live = json!({"type": "object", "properties": {"different": {"type": "string"}}});
    let fetcher = MapFetcher::new().available("mcp_weather", Some(live), None);

    let result = Validator::new(ValidationMode::Lenient)
        .with_fetcher(&fetcher)
        .validate(&doc_with_cached_schema(false))
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn strict_mode_flags_live_schema_gone_missing() {
    // Cached snapshot present but the live tool no longer reports one.
    let fetcher = MapFetcher::new().available("mcp_weather", None, None);

    let err = Validator::new(ValidationMode::Strict)
        .with_fetcher(&fetcher)
        .validate(&doc_with_cached_schema(false))
        .await
        .unwrap_err();
    match err {
        PipelineError::SchemaDrift { skill_id, live, .. } => {
            assert_eq!(skill_id, "mcp_weather");
            assert_eq!(live, Value::Null);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn required_skill_unavailable_fails_in_both_modes() {
    let fetcher = MapFetcher::new();

    for mode in [ValidationMode::Lenient, ValidationMode::Strict] {
        let err = Validator::new(mode)
            .with_fetcher(&fetcher)
            .validate(&doc_with_cached_schema(false))
            .await
            .unwrap_err();
        match err {
            PipelineError::RequiredSkillUnavailable(id) => assert_eq!(id, "mcp_weather"),
            other => panic!("unexpected error in {mode:?}: {other:?}"),
        }
    }
}

#[tokio::test]
async fn optional_skill_unavailable_records_warning() {
    let fetcher = MapFetcher::new();

    let (config, warnings) = Validator::new(ValidationMode::Lenient)
        .with_fetcher(&fetcher)
        .validate(&doc_with_cached_schema(true))
        .await
        .unwrap();

    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].skill_id, "mcp_weather");
    // The skill stays in the document; unavailability only downgrades to a warning.
    assert_eq!(config.agent_card.skills.len(), 1);
}

#[tokio::test]
async fn fetch_timeout_treated_as_unavailable() {
    let fetcher = StalledFetcher;

    let err = Validator::new(ValidationMode::Lenient)
        .with_fetcher(&fetcher)
        .with_fetch_timeout(Duration::from_millis(20))
        .validate(&doc_with_cached_schema(false))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::RequiredSkillUnavailable(_)));

    let (_, warnings) = Validator::new(ValidationMode::Lenient)
        .with_fetcher(&fetcher)
        .with_fetch_timeout(Duration::from_millis(20))
        .validate(&doc_with_cached_schema(true))
        .await
        .unwrap();
    assert_eq!(warnings.len(), 1);
}

#[tokio::test]
async fn skill_without_cached_schema_passes_strict() {
    let doc = json!({
        "agent_card": {
            "name": "A",
            "skills": [{
                "id": "mcp_fresh",
                "mcp_config": {"transport": "stdio", "command": "fresh-tool"}
            }]
        }
    });
    let fetcher = MapFetcher::new().available(
        "mcp_fresh",
        Some(json!({"type": "object"})),
        Some(json!({"type": "object"})),
    );

    let result = Validator::new(ValidationMode::Strict)
        .with_fetcher(&fetcher)
        .validate(&doc)
        .await;
    assert!(result.is_ok());
}
