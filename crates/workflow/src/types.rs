//! Workflow configuration types.
//!
//! These mirror the sections of an agent workflow `config.yml` that
//! Railguard reads. Anything else in the file is left to the workflow
//! runtime.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A workflow configuration loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    /// Runtime-wide settings
    #[serde(default)]
    pub general: GeneralSection,

    /// Tools available to the agent, by name
    #[serde(default)]
    pub functions: BTreeMap<String, ComponentSpec>,

    /// Language models, by name
    #[serde(default)]
    pub llms: BTreeMap<String, ComponentSpec>,

    /// Embedding models, by name
    #[serde(default)]
    pub embedders: BTreeMap<String, ComponentSpec>,

    /// The agent itself
    pub workflow: WorkflowSpec,
}

/// The `general` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralSection {
    #[serde(default)]
    pub front_end: Option<FrontEndSpec>,
}

/// Where the runtime serves the workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontEndSpec {
    #[serde(rename = "_type", default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub host: Option<String>,

    #[serde(default)]
    pub port: Option<u16>,
}

/// A named component (function, LLM, embedder).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentSpec {
    /// Registered component type
    #[serde(rename = "_type")]
    pub kind: String,

    /// Component-specific settings
    #[serde(flatten)]
    pub settings: BTreeMap<String, serde_yaml::Value>,
}

/// The `workflow` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowSpec {
    /// Agent type (e.g. "react_agent")
    #[serde(rename = "_type")]
    pub kind: String,

    /// Functions the agent may call
    #[serde(default)]
    pub tool_names: Vec<String>,

    /// LLM driving the agent
    #[serde(default)]
    pub llm_name: Option<String>,
}

impl WorkflowDefinition {
    /// Base URL derived from the front end section, if it names a port.
    ///
    /// Wildcard hosts are reached through localhost. IPv6 literals are
    /// bracketed.
    pub fn endpoint(&self) -> Option<String> {
        let front_end = self.general.front_end.as_ref()?;
        let port = front_end.port?;
        let host = match front_end.host.as_deref() {
            None | Some("") | Some("0.0.0.0") | Some("::") | Some("[::]") => "localhost",
            Some(host) => host,
        };
        if host.contains(':') && !host.starts_with('[') {
            Some(format!("http://[{}]:{}", host, port))
        } else {
            Some(format!("http://{}:{}", host, port))
        }
    }

    /// Whether any function is of the given registered type.
    pub fn uses_function_type(&self, kind: &str) -> bool {
        self.functions.values().any(|f| f.kind == kind)
    }
}
