//! Command-line argument types.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "agent-forge", version, about = "Resolve and validate MCP agent configurations")]
pub struct Cli {
    /// Verbose output (debug-level logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log destination: off, stdout, stderr, or a file path
    #[arg(long, global = true, default_value = "stderr")]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate an agent configuration (structural checks, offline)
    Validate {
        /// Path to the base configuration document (JSON or YAML)
        config: PathBuf,

        /// Structured overrides file applied after the base document
        #[arg(long)]
        overrides: Option<PathBuf>,

        /// Dot-path assignment, e.g. deployment.llm.temperature=0.5
        /// (repeatable, applied in order)
        #[arg(long = "set", value_name = "PATH=VALUE")]
        set: Vec<String>,
    },

    /// Merge, expand, and print or write the resolved document
    Resolve {
        /// Path to the base configuration document (JSON or YAML)
        config: PathBuf,

        /// Structured overrides file applied after the base document
        #[arg(long)]
        overrides: Option<PathBuf>,

        /// Dot-path assignment (repeatable, applied in order)
        #[arg(long = "set", value_name = "PATH=VALUE")]
        set: Vec<String>,

        /// Write the resolved document here instead of stdout
        /// (format follows the extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit the public agent card only (deployment section stripped)
        #[arg(long)]
        card: bool,
    },

    /// Write an example configuration document
    Example {
        /// Output path for the example config
        #[arg(short, long, default_value = "example_agent.json")]
        output: PathBuf,
    },
}
