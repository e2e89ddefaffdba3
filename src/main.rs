//! Agent Forge CLI
//!
//! Config-driven front end for MCP agent configurations: layered override
//! merging, environment expansion, and schema validation.

use agent_forge::cli::{Cli, Command};
use agent_forge::config::{DocumentFormat, serialize_document};
use agent_forge::error::PipelineError;
use agent_forge::pipeline::Pipeline;
use anyhow::Result;
use clap::Parser;
use serde_json::json;
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::path::Path;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on --log option
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    match cli.log.as_str() {
        "0" | "off" => {
            // No logging
        }
        "1" | "stdout" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        "2" | "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            // Log to file (append mode)
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(filename)?;
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }

    match cli.command {
        Command::Validate {
            config,
            overrides,
            set,
        } => run_validate(&config, overrides.as_deref(), &set).await,
        Command::Resolve {
            config,
            overrides,
            set,
            output,
            card,
        } => run_resolve(&config, overrides.as_deref(), &set, output.as_deref(), card).await,
        Command::Example { output } => run_example(&output),
    }
}

fn build_pipeline(config: &Path, overrides: Option<&Path>, set: &[String]) -> Pipeline {
    let mut pipeline = Pipeline::new(config).with_env(std::env::vars().collect::<HashMap<_, _>>());
    if let Some(path) = overrides {
        pipeline = pipeline.with_overrides_file(path);
    }
    for assignment in set {
        pipeline = pipeline.with_assignment(assignment);
    }
    pipeline
}

/// Run the validate command.
///
/// Offline validation: structural checks only, since the tool-discovery
/// collaborator lives in the deployment layer and is not wired up here.
async fn run_validate(config: &Path, overrides: Option<&Path>, set: &[String]) -> Result<()> {
    let pipeline = build_pipeline(config, overrides, set);

    match pipeline.resolve(None).await {
        Ok(resolved) => {
            println!("Configuration is valid.");
            println!("  Agent:  {}", resolved.config.agent_card.name);
            if let Some(deployment) = &resolved.config.deployment {
                println!("  Model:  {}", deployment.llm.model);
            }
            println!("  Skills: {}", resolved.config.agent_card.skills.len());
            Ok(())
        }
        Err(PipelineError::SchemaViolations(violations)) => {
            eprintln!("Configuration is invalid ({} violations):", violations.len());
            for violation in &violations {
                eprintln!("  - {violation}");
            }
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

/// Run the resolve command.
async fn run_resolve(
    config: &Path,
    overrides: Option<&Path>,
    set: &[String],
    output: Option<&Path>,
    card: bool,
) -> Result<()> {
    let pipeline = build_pipeline(config, overrides, set);
    let resolved = pipeline.resolve(None).await?;

    let document = if card {
        resolved.public_card()
    } else {
        resolved.document.clone()
    };

    match output {
        Some(path) => {
            Pipeline::save(&document, path)?;
            info!(path = %path.display(), "Resolved configuration written");
        }
        None => {
            print!("{}", serialize_document(&document, DocumentFormat::Json)?);
        }
    }
    Ok(())
}

/// Write an example configuration document.
fn run_example(output: &Path) -> Result<()> {
    let example = json!({
        "agent_card": {
            "name": "Example Agent",
            "description": "An example AI agent for demonstration",
            "url": "https://your-domain.com/example-agent",
            "version": "1.0.0",
            "defaultInputModes": ["text/plain"],
            "defaultOutputModes": ["text/plain", "application/json"],
            "capabilities": {
                "streaming": true,
                "pushNotifications": false,
                "stateTransitionHistory": false
            },
            "skills": [
                {
                    "id": "mcp_weather",
                    "name": "weather",
                    "description": "MCP tool: weather lookup",
                    "tags": ["mcp", "tool"],
                    "mcp_config": {
                        "transport": "http",
                        "url": "${WEATHER_MCP_URL:-http://localhost:8000/mcp}"
                    },
                    "optional": false
                }
            ]
        },
        "deployment": {
            "llm": {
                "model": "claude-3-5-sonnet-20241022",
                "temperature": 0.7,
                "system_prompt": "You are a helpful AI assistant. Use the available tools to help users with their requests."
            },
            "resources": {
                "cpu": 1.0,
                "memory_mb": 2048,
                "timeout_seconds": 300,
                "keep_warm": 0
            }
        }
    });

    Pipeline::save(&example, output)?;
    println!("Example configuration created: {}", output.display());
    Ok(())
}
