//! Agent workflow execution.
//!
//! The workflow runtime serves a configured agent over HTTP
//! (`POST /generate` with `{"input_message": ...}`). Errors raised inside
//! the agent come back as error responses whose body carries the runtime's
//! exception text; that text is kept in the returned error so callers can
//! classify it.

use crate::loader::load_workflow;
use crate::types::WorkflowDefinition;
use railguard_core::{AppConfig, AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Endpoint used when neither the config nor the workflow file names one.
pub const DEFAULT_WORKFLOW_ENDPOINT: &str = "http://localhost:8000";

/// Default timeout for a workflow run, in seconds. Agent runs with web
/// search are slow.
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Trait for agent workflows.
#[async_trait::async_trait]
pub trait Workflow: Send + Sync {
    /// Get the workflow name (the agent type).
    fn name(&self) -> &str;

    /// Run the workflow on one user input and return its answer as text.
    async fn run(&self, input: &str) -> AppResult<String>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    input_message: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenerateResponse {
    Value { value: serde_json::Value },
    Output { output: serde_json::Value },
    Text(String),
}

impl GenerateResponse {
    fn into_text(self) -> String {
        let value = match self {
            Self::Value { value } => value,
            Self::Output { output } => output,
            Self::Text(text) => return text,
        };
        match value {
            serde_json::Value::String(text) => text,
            other => other.to_string(),
        }
    }
}

/// HTTP client for a served agent workflow.
pub struct HttpWorkflow {
    name: String,
    base_url: String,
    client: reqwest::Client,
}

impl HttpWorkflow {
    /// Create a client for the workflow served at `base_url`.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Option<u64>,
    ) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout.unwrap_or(DEFAULT_TIMEOUT_SECS)))
            .build()
            .map_err(|e| AppError::Workflow(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait::async_trait]
impl Workflow for HttpWorkflow {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, input: &str) -> AppResult<String> {
        tracing::debug!("Running workflow {} at {}", self.name, self.base_url);

        let url = format!("{}/generate", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&GenerateRequest {
                input_message: input,
            })
            .send()
            .await
            .map_err(|e| AppError::Workflow(format!("Failed to send request to workflow: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Workflow(format!(
                "Workflow API error ({}): {}",
                status, error_text
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AppError::Workflow(format!("Failed to parse workflow response: {}", e)))?;

        Ok(body.into_text())
    }
}

/// Load the configured workflow and connect to it.
///
/// The endpoint is taken from the application config, then from the
/// workflow's front end section, then [`DEFAULT_WORKFLOW_ENDPOINT`].
pub fn open_workflow(config: &AppConfig) -> AppResult<(WorkflowDefinition, HttpWorkflow)> {
    let definition = load_workflow(&config.workflow_config_path())?;

    let endpoint = config
        .workflow
        .endpoint
        .clone()
        .or_else(|| definition.endpoint())
        .unwrap_or_else(|| DEFAULT_WORKFLOW_ENDPOINT.to_string());

    let workflow = HttpWorkflow::new(
        definition.workflow.kind.clone(),
        endpoint,
        config.workflow.timeout,
    )?;

    Ok((definition, workflow))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};
    use tempfile::TempDir;

    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", address)
    }

    #[test]
    fn test_decode_response_shapes() {
        let decode = |v: Value| serde_json::from_value::<GenerateResponse>(v).unwrap().into_text();
        assert_eq!(decode(json!({"value": "answer"})), "answer");
        assert_eq!(decode(json!({"output": "answer"})), "answer");
        assert_eq!(decode(json!("answer")), "answer");
        assert_eq!(decode(json!({"value": {"a": 1}})), r#"{"a":1}"#);
    }

    #[tokio::test]
    async fn test_run_posts_input_message() {
        let router = Router::new().route(
            "/generate",
            post(|Json(body): Json<Value>| async move {
                Json(json!({
                    "value": format!("echo: {}", body["input_message"].as_str().unwrap_or_default())
                }))
            }),
        );
        let base_url = spawn_stub(router).await;

        let workflow = HttpWorkflow::new("react_agent", base_url, Some(5)).unwrap();
        let answer = workflow.run("what is davis?").await.unwrap();
        assert_eq!(answer, "echo: what is davis?");
        assert_eq!(workflow.name(), "react_agent");
    }

    #[tokio::test]
    async fn test_run_keeps_exception_text() {
        let router = Router::new().route(
            "/generate",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"detail": "list index out of range"})),
                )
            }),
        );
        let base_url = spawn_stub(router).await;

        let workflow = HttpWorkflow::new("react_agent", base_url, Some(5)).unwrap();
        let err = workflow.run("hi").await.unwrap_err().to_string();
        assert!(err.contains("list index out of range"));
    }

    #[test]
    fn test_open_workflow_endpoint_precedence() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("workflow_config");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("config.yml"),
            "general:\n  front_end:\n    port: 9100\nworkflow:\n  _type: react_agent\n",
        )
        .unwrap();

        let mut config = AppConfig {
            workspace: temp_dir.path().to_path_buf(),
            ..AppConfig::default()
        };

        let (_, workflow) = open_workflow(&config).unwrap();
        assert_eq!(workflow.base_url(), "http://localhost:9100");

        config.workflow.endpoint = Some("http://agents.internal:8000/".to_string());
        let (definition, workflow) = open_workflow(&config).unwrap();
        assert_eq!(workflow.base_url(), "http://agents.internal:8000");
        assert_eq!(definition.workflow.kind, "react_agent");
    }
}
