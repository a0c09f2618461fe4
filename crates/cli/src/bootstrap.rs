//! Start-up checks and guardrails initialization shared by `serve` and `ask`.

use railguard_core::{AppConfig, AppError, AppResult};
use railguard_rails::{create_rails, Guardrails};
use railguard_workflow::load_workflow;
use std::sync::Arc;

/// Everything a query needs that is set up once per process.
pub struct Application {
    pub config: AppConfig,
    pub service_name: String,
    /// `None` when the guardrail engine could not be set up; queries with
    /// guardrails enabled are then refused.
    pub rails: Option<Arc<dyn Guardrails>>,
}

/// Check config files, initialize guardrails, and log the telemetry identity.
pub fn bootstrap(config: AppConfig) -> AppResult<Application> {
    tracing::info!("Starting application bootstrap");

    config.validate()?;
    ensure_config_files(&config)?;

    let service_name = config.service_name();
    tracing::info!(
        service.name = %service_name,
        otlp.endpoint = %config.telemetry.otlp_endpoint,
        "Telemetry identity configured"
    );

    warn_missing_search_key(&config, std::env::var("TAVILY_API_KEY").ok().as_deref());

    let rails = match create_rails(&config) {
        Ok(rails) => Some(rails),
        Err(e) => {
            tracing::warn!("Failed to initialize guardrails: {}", e);
            None
        }
    };

    Ok(Application {
        config,
        service_name,
        rails,
    })
}

/// Fail when either live config file is missing.
pub fn ensure_config_files(config: &AppConfig) -> AppResult<()> {
    let missing = config.missing_config_files();
    if missing.is_empty() {
        return Ok(());
    }

    for path in &missing {
        tracing::error!("Missing config file: {}", path.display());
    }

    let listed = missing
        .iter()
        .map(|path| format!("  - {}", path.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(AppError::Config(format!(
        "Missing config files:\n{}\nRun `railguard configure <local|build|brev>` first",
        listed
    )))
}

/// Warn when the workflow uses web search but no search key is set.
///
/// The key is consumed by the workflow runtime, so this is only a hint.
/// Returns whether a warning was logged.
fn warn_missing_search_key(config: &AppConfig, api_key: Option<&str>) -> bool {
    let uses_search = load_workflow(&config.workflow_config_path())
        .map(|definition| definition.uses_function_type("tavily_search"))
        .unwrap_or(false);

    if uses_search && api_key.map_or(true, |key| key.trim().is_empty()) {
        tracing::warn!("TAVILY_API_KEY is not set; the workflow's web search tool will fail");
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use railguard_core::config::GuardrailsBackend;
    use std::fs;
    use tempfile::TempDir;

    fn workspace(workflow_yaml: &str) -> (TempDir, AppConfig) {
        let temp_dir = TempDir::new().unwrap();
        let config = AppConfig {
            workspace: temp_dir.path().to_path_buf(),
            ..AppConfig::default()
        };
        fs::create_dir_all(config.guardrails_dir()).unwrap();
        fs::write(config.guardrails_config_path(), "models: []\n").unwrap();
        let workflow_path = config.workflow_config_path();
        fs::create_dir_all(workflow_path.parent().unwrap()).unwrap();
        fs::write(&workflow_path, workflow_yaml).unwrap();
        (temp_dir, config)
    }

    #[test]
    fn test_missing_files_are_listed() {
        let temp_dir = TempDir::new().unwrap();
        let config = AppConfig {
            workspace: temp_dir.path().to_path_buf(),
            ..AppConfig::default()
        };

        let err = ensure_config_files(&config).unwrap_err().to_string();
        assert!(err.contains("guardrails_config"));
        assert!(err.contains("workflow_config"));
        assert!(err.contains("railguard configure"));
    }

    #[test]
    fn test_bootstrap_with_local_rails() {
        let (_temp_dir, mut config) = workspace("workflow:\n  _type: react_agent\n");
        config.guardrails.backend = GuardrailsBackend::Local;
        config.telemetry.user_suffix = Some("octocat".to_string());

        let app = bootstrap(config).unwrap();
        assert_eq!(app.service_name, "railguard-octocat");
        assert_eq!(app.rails.map(|r| r.backend_name().to_string()), Some("local".to_string()));
    }

    #[test]
    fn test_bootstrap_keeps_going_without_rails() {
        let (_temp_dir, mut config) = workspace("workflow:\n  _type: react_agent\n");
        config.guardrails.backend = GuardrailsBackend::Local;
        config.guardrails.input_actions = vec!["check_nothing".to_string()];

        let app = bootstrap(config).unwrap();
        assert!(app.rails.is_none());
    }

    #[test]
    fn test_search_key_warning() {
        let (_temp_dir, config) = workspace(
            "functions:\n  search:\n    _type: tavily_search\nworkflow:\n  _type: react_agent\n  tool_names: [search]\n",
        );
        assert!(warn_missing_search_key(&config, None));
        assert!(warn_missing_search_key(&config, Some(" ")));
        assert!(!warn_missing_search_key(&config, Some("tvly-123")));

        let (_temp_dir, config) = workspace("workflow:\n  _type: react_agent\n");
        assert!(!warn_missing_search_key(&config, None));
    }
}
