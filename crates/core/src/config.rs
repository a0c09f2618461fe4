//! Configuration management for Railguard.
//!
//! Configuration is merged from several sources, later ones winning:
//! - Built-in defaults
//! - Config file (`.railguard/config.yaml` in the workspace, or `RAILGUARD_CONFIG`)
//! - Environment variables
//! - Command-line flags
//!
//! Relative paths in the config (guardrails directory, workflow config) are
//! resolved against the workspace when they are used, so a later workspace
//! override still applies to them.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Base service name reported in traces.
pub const DEFAULT_SERVICE_NAME: &str = "railguard";

/// Default OTLP collector endpoint.
pub const DEFAULT_OTLP_ENDPOINT: &str = "http://localhost:4318";

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .railguard/ and the rails/workflow configs)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Log level override
    pub log_level: Option<String>,

    /// Log output format
    pub log_format: LogFormat,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    pub server: ServerConfig,

    pub guardrails: GuardrailsConfig,

    pub workflow: WorkflowConfig,

    pub telemetry: TelemetryConfig,
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Web server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8501
}

/// Which guardrail engine answers the rail checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuardrailsBackend {
    /// External guardrails server reached over HTTP
    #[default]
    Remote,
    /// Heuristic rail actions evaluated in-process
    Local,
}

impl GuardrailsBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Local => "local",
        }
    }
}

/// Guardrail engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardrailsConfig {
    #[serde(default)]
    pub backend: GuardrailsBackend,

    /// Base URL of the guardrails server
    #[serde(default = "default_guardrails_endpoint")]
    pub endpoint: String,

    /// Directory holding the rails `config.yml`
    #[serde(default = "default_guardrails_dir")]
    pub config_dir: PathBuf,

    /// Config id sent to the server (defaults to the directory name)
    #[serde(default)]
    pub config_id: Option<String>,

    /// Request timeout in seconds
    #[serde(default)]
    pub timeout: Option<u64>,

    /// Rail actions run on user input by the local backend
    #[serde(default = "default_input_actions")]
    pub input_actions: Vec<String>,

    /// Rail actions run on workflow output by the local backend
    #[serde(default = "default_output_actions")]
    pub output_actions: Vec<String>,
}

impl Default for GuardrailsConfig {
    fn default() -> Self {
        Self {
            backend: GuardrailsBackend::default(),
            endpoint: default_guardrails_endpoint(),
            config_dir: default_guardrails_dir(),
            config_id: None,
            timeout: None,
            input_actions: default_input_actions(),
            output_actions: default_output_actions(),
        }
    }
}

fn default_guardrails_endpoint() -> String {
    "http://localhost:8080".to_string()
}

fn default_guardrails_dir() -> PathBuf {
    PathBuf::from("guardrails_config")
}

fn default_input_actions() -> Vec<String> {
    [
        "check_input_length",
        "check_jailbreak",
        "check_blocked_terms",
        "check_politics",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_output_actions() -> Vec<String> {
    vec!["check_blocked_terms".to_string()]
}

/// Agent workflow settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowConfig {
    /// Path to the workflow `config.yml`
    #[serde(default = "default_workflow_config")]
    pub config_path: PathBuf,

    /// Base URL of the served workflow (derived from the workflow config when unset)
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    #[serde(default)]
    pub timeout: Option<u64>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            config_path: default_workflow_config(),
            endpoint: None,
            timeout: None,
        }
    }
}

fn default_workflow_config() -> PathBuf {
    PathBuf::from("workflow_config/config.yml")
}

/// Trace export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryConfig {
    #[serde(default = "default_service_name")]
    pub service_name: String,

    #[serde(default = "default_otlp_endpoint")]
    pub otlp_endpoint: String,

    /// Appended to the service name when set (`GITHUB_USER`)
    #[serde(default)]
    pub user_suffix: Option<String>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            otlp_endpoint: default_otlp_endpoint(),
            user_suffix: None,
        }
    }
}

fn default_service_name() -> String {
    DEFAULT_SERVICE_NAME.to_string()
}

fn default_otlp_endpoint() -> String {
    DEFAULT_OTLP_ENDPOINT.to_string()
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    logging: Option<LoggingSection>,
    server: Option<ServerConfig>,
    guardrails: Option<GuardrailsConfig>,
    workflow: Option<WorkflowConfig>,
    telemetry: Option<TelemetrySection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
    format: Option<LogFormat>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TelemetrySection {
    service_name: Option<String>,
    otlp_endpoint: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            log_level: None,
            log_format: LogFormat::default(),
            verbose: false,
            no_color: false,
            server: ServerConfig::default(),
            guardrails: GuardrailsConfig::default(),
            workflow: WorkflowConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment and defaults.
    ///
    /// Environment variables:
    /// - `RAILGUARD_WORKSPACE`: Override workspace path
    /// - `RAILGUARD_CONFIG`: Path to config file
    /// - `RAILGUARD_GUARDRAILS_URL`: Guardrails server base URL
    /// - `RAILGUARD_WORKFLOW_URL`: Workflow server base URL
    /// - `OTEL_OTLP_ENDPOINT`: OTLP collector endpoint
    /// - `GITHUB_USER`: Suffix for the traced service name
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use railguard_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Workspace: {:?}", config.workspace);
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_with(None, None, |key| std::env::var(key).ok())
    }

    /// Load configuration with an explicit workspace/config file and an
    /// environment lookup.
    ///
    /// Explicit arguments take precedence over `RAILGUARD_WORKSPACE` and
    /// `RAILGUARD_CONFIG`.
    pub fn load_with<F>(
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        env: F,
    ) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(workspace) = workspace.or_else(|| env("RAILGUARD_WORKSPACE").map(PathBuf::from))
        {
            config.workspace = workspace;
        }

        config.config_file = config_file.or_else(|| env("RAILGUARD_CONFIG").map(PathBuf::from));

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = match config.config_file {
            Some(ref cf) => cf.clone(),
            None => config.railguard_dir().join("config.yaml"),
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        } else if config.config_file.is_some() {
            return Err(AppError::Config(format!(
                "Config file not found: {:?}",
                config_path
            )));
        }

        // Environment variables override YAML config
        if let Some(url) = non_empty(env("RAILGUARD_GUARDRAILS_URL")) {
            config.guardrails.endpoint = url;
        }

        if let Some(url) = non_empty(env("RAILGUARD_WORKFLOW_URL")) {
            config.workflow.endpoint = Some(url);
        }

        if let Some(endpoint) = non_empty(env("OTEL_OTLP_ENDPOINT")) {
            config.telemetry.otlp_endpoint = endpoint;
        }

        config.telemetry.user_suffix = non_empty(env("GITHUB_USER"));

        if let Some(level) = non_empty(env("RUST_LOG")) {
            config.log_level = Some(level);
        }

        if env("NO_COLOR").is_some() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
            if let Some(format) = logging.format {
                result.log_format = format;
            }
        }

        if let Some(server) = config_file.server {
            result.server = server;
        }

        if let Some(guardrails) = config_file.guardrails {
            result.guardrails = guardrails;
        }

        if let Some(workflow) = config_file.workflow {
            result.workflow = workflow;
        }

        if let Some(telemetry) = config_file.telemetry {
            if let Some(name) = telemetry.service_name {
                result.telemetry.service_name = name;
            }
            if let Some(endpoint) = telemetry.otlp_endpoint {
                result.telemetry.otlp_endpoint = endpoint;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over the config file and the
    /// environment.
    pub fn with_overrides(
        mut self,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
        guardrails_url: Option<String>,
        workflow_url: Option<String>,
    ) -> Self {
        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        if let Some(url) = guardrails_url {
            self.guardrails.endpoint = url;
        }

        if let Some(url) = workflow_url {
            self.workflow.endpoint = Some(url);
        }

        self
    }

    /// Get the path to the .railguard directory.
    pub fn railguard_dir(&self) -> PathBuf {
        self.workspace.join(".railguard")
    }

    /// Directory holding the guardrails configuration.
    pub fn guardrails_dir(&self) -> PathBuf {
        self.resolve(&self.guardrails.config_dir)
    }

    /// The guardrails `config.yml`.
    pub fn guardrails_config_path(&self) -> PathBuf {
        self.guardrails_dir().join("config.yml")
    }

    /// The workflow `config.yml`.
    pub fn workflow_config_path(&self) -> PathBuf {
        self.resolve(&self.workflow.config_path)
    }

    /// Both live config files, guardrails first.
    pub fn live_config_files(&self) -> Vec<PathBuf> {
        vec![self.guardrails_config_path(), self.workflow_config_path()]
    }

    /// Live config files that do not exist on disk.
    pub fn missing_config_files(&self) -> Vec<PathBuf> {
        self.live_config_files()
            .into_iter()
            .filter(|path| !path.exists())
            .collect()
    }

    /// Service name reported in traces, suffixed with the GitHub user when known.
    pub fn service_name(&self) -> String {
        match self.telemetry.user_suffix.as_deref() {
            Some(user) if !user.is_empty() => format!("{}-{}", self.telemetry.service_name, user),
            _ => self.telemetry.service_name.clone(),
        }
    }

    /// Validate endpoint and server settings.
    pub fn validate(&self) -> AppResult<()> {
        check_url("guardrails endpoint", &self.guardrails.endpoint)?;

        if let Some(ref endpoint) = self.workflow.endpoint {
            check_url("workflow endpoint", endpoint)?;
        }

        check_url("OTLP endpoint", &self.telemetry.otlp_endpoint)?;

        if self.server.port == 0 {
            return Err(AppError::Config("Server port must be non-zero".to_string()));
        }

        Ok(())
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace.join(path)
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn check_url(name: &str, url: &str) -> AppResult<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(AppError::Config(format!(
            "Invalid {}: {}. Expected an http:// or https:// URL",
            name, url
        )))
    }
}
