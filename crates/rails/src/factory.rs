//! Guardrails backend factory.
//!
//! Creates the guardrail engine selected in the application configuration.

use crate::client::Guardrails;
use crate::providers::{LocalRails, NemoRailsClient};
use railguard_core::config::GuardrailsBackend;
use railguard_core::{AppConfig, AppError, AppResult};
use std::sync::Arc;

/// Create the configured guardrail engine.
///
/// The remote backend needs the guardrails config directory to exist; its
/// name is the config id sent to the server unless one is configured. The
/// local backend resolves its action names up front.
///
/// # Errors
/// Returns error if:
/// - The guardrails config directory is missing (remote)
/// - An action name is unknown (local)
/// - The HTTP client cannot be built
pub fn create_rails(config: &AppConfig) -> AppResult<Arc<dyn Guardrails>> {
    match config.guardrails.backend {
        GuardrailsBackend::Remote => {
            let dir = config.guardrails_dir();
            if !dir.exists() {
                return Err(AppError::Guardrails(format!(
                    "Guardrails config not found at: {}",
                    dir.display()
                )));
            }

            let config_id = config.guardrails.config_id.clone().or_else(|| {
                dir.file_name()
                    .and_then(|name| name.to_str())
                    .map(|name| name.to_string())
            });

            let client = NemoRailsClient::new(
                config.guardrails.endpoint.as_str(),
                config_id,
                config.guardrails.timeout,
            )?;

            tracing::info!(
                "Guardrails initialized: server {} (config {:?})",
                client.base_url(),
                client.config_id()
            );
            Ok(Arc::new(client))
        }
        GuardrailsBackend::Local => {
            let rails = LocalRails::from_names(
                &config.guardrails.input_actions,
                &config.guardrails.output_actions,
            )?;
            tracing::info!(
                "Guardrails initialized: {} local input rail(s), {} local output rail(s)",
                rails.input_actions().len(),
                rails.output_actions().len()
            );
            Ok(Arc::new(rails))
        }
    }
}
