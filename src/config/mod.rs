//! Configuration pipeline for agent documents.
//!
//! An agent configuration is a nested document (JSON or YAML) with two
//! sub-trees: `agent_card` (the public-facing description, including the
//! skill list) and `deployment` (private runtime parameters). This module
//! implements the four pipeline stages that turn a base document plus
//! overrides into a validated, fully-resolved configuration:
//!
//! 1. **Loader** - read base document and override fragments from disk
//! 2. **Merger** - deep merge, field-by-field; `agent_card.skills` merges
//!    by `id` instead of positionally
//! 3. **Expander** - `${VAR}` / `${VAR:-default}` substitution from an
//!    injected environment map
//! 4. **Validator** - batched structural checks, plus live availability
//!    and (in strict mode) schema-drift checks against a tool-discovery
//!    collaborator
//!
//! ## Merge Strategy
//! - Mappings: deep merge field-by-field
//! - `agent_card.skills`: merge entries by `id`, append new ids in order
//! - All other sequences and any type mismatch: override replaces wholesale

mod document;
mod expand;
mod loader;
mod merge;
mod overrides;
mod types;
mod validate;

pub use document::{DocumentFormat, parse_document, public_view, serialize_document};
pub use expand::expand;
pub use loader::{load_document, load_overrides, save_document};
pub use merge::{SKILLS_PATH, deep_merge, deep_merge_all};
pub use overrides::{parse_assignment, parse_literal};
pub use types::*;
pub use validate::{SchemaFetch, SchemaFetcher, ValidationMode, Validator};
