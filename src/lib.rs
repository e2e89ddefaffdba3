//! Agent Forge Library
//!
//! This module exports the configuration pipeline components for testing
//! and integration.

pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
