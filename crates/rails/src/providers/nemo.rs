//! Guardrails server client.
//!
//! Talks to a NeMo Guardrails server over its OpenAI-style chat endpoint:
//! `POST /v1/chat/completions` with a `config_id` and the conversation.

use crate::client::{ChatMessage, Guardrails, RailsOutput, RailsRequest};
use railguard_core::{AppError, AppResult};
use std::time::Duration;

/// Default timeout for a rails generation, in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// HTTP client for a guardrails server.
pub struct NemoRailsClient {
    /// Base URL of the guardrails server
    base_url: String,

    /// Rails configuration id on the server
    config_id: Option<String>,

    /// HTTP client
    client: reqwest::Client,
}

impl NemoRailsClient {
    /// Create a client for `base_url` using the given rails configuration.
    pub fn new(
        base_url: impl Into<String>,
        config_id: Option<String>,
        timeout: Option<u64>,
    ) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout.unwrap_or(DEFAULT_TIMEOUT_SECS)))
            .build()
            .map_err(|e| AppError::Guardrails(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            config_id,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn config_id(&self) -> Option<&str> {
        self.config_id.as_deref()
    }

    fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }
}

#[async_trait::async_trait]
impl Guardrails for NemoRailsClient {
    fn backend_name(&self) -> &str {
        "nemo"
    }

    async fn generate(&self, messages: &[ChatMessage]) -> AppResult<RailsOutput> {
        tracing::debug!(
            "Sending {} message(s) to guardrails server {}",
            messages.len(),
            self.base_url
        );

        let request = RailsRequest::new(self.config_id.clone(), messages);

        let response = self
            .client
            .post(self.completions_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                AppError::Guardrails(format!("Failed to send request to guardrails server: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Guardrails(format!(
                "Guardrails API error ({}): {}",
                status, error_text
            )));
        }

        let output: RailsOutput = response.json().await.map_err(|e| {
            AppError::Guardrails(format!("Failed to parse guardrails response: {}", e))
        })?;

        tracing::debug!("Guardrails response: {:?}", output);

        Ok(output)
    }
}
