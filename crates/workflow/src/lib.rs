//! Agent workflow access for Railguard.
//!
//! This crate provides:
//! - YAML workflow config loading and validation
//! - The `Workflow` trait for running an agent on one input
//! - An HTTP client for a workflow served by the agent runtime

pub mod client;
pub mod loader;
pub mod types;

// Re-export main types
pub use client::{open_workflow, HttpWorkflow, Workflow, DEFAULT_WORKFLOW_ENDPOINT};
pub use loader::load_workflow;
pub use types::{ComponentSpec, FrontEndSpec, GeneralSection, WorkflowDefinition, WorkflowSpec};
