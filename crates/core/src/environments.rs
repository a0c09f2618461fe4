//! Switching the live rails/workflow config files between deployment
//! environments.
//!
//! Each config directory carries one template per environment
//! (`config.yml.local`, `config.yml.build`, `config.yml.brev`). Switching
//! copies the template over `config.yml`. The `brev` templates reference the
//! hosted model endpoints through placeholders that are filled in from the
//! environment afterwards.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Environment variables holding the hosted model endpoints for `brev`.
pub const MODEL_ENDPOINT_VARS: [&str; 4] = [
    "NVIDIA_MODEL_ENDPOINT_8001",
    "NVIDIA_MODEL_ENDPOINT_8002",
    "NVIDIA_MODEL_ENDPOINT_8003",
    "NVIDIA_MODEL_ENDPOINT_8004",
];

/// Target deployment environment for the config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigEnvironment {
    Local,
    Build,
    Brev,
}

impl ConfigEnvironment {
    /// Parse environment name from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "local" => Some(Self::Local),
            "build" => Some(Self::Build),
            "brev" => Some(Self::Brev),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Build => "build",
            Self::Brev => "brev",
        }
    }

    /// Template file name for this environment.
    pub fn template_name(&self) -> String {
        format!("config.yml.{}", self.as_str())
    }
}

/// What a switch did, for reporting.
#[derive(Debug, Clone, Default)]
pub struct SwitchReport {
    /// (template, live file) pairs that were copied
    pub copied: Vec<(PathBuf, PathBuf)>,
    /// Live files whose endpoint placeholders were substituted
    pub substituted: Vec<PathBuf>,
}

/// Switch the given live config files to `environment`.
///
/// Templates are copied first, failing on the first missing one. For `brev`
/// every variable in [`MODEL_ENDPOINT_VARS`] must then be set and non-empty;
/// all missing names are reported together before any file is rewritten.
pub fn switch_environment<F>(
    live_files: &[PathBuf],
    environment: ConfigEnvironment,
    env: F,
) -> AppResult<SwitchReport>
where
    F: Fn(&str) -> Option<String>,
{
    let mut report = SwitchReport::default();

    for live in live_files {
        let template = template_path(live, environment)?;
        if !template.exists() {
            return Err(AppError::Config(format!(
                "Config template not found: {}",
                template.display()
            )));
        }

        fs::copy(&template, live).map_err(|e| {
            AppError::Config(format!(
                "Failed to copy {} to {}: {}",
                template.display(),
                live.display(),
                e
            ))
        })?;
        tracing::info!("Copied {} -> {}", template.display(), live.display());
        report.copied.push((template, live.clone()));
    }

    if environment == ConfigEnvironment::Brev {
        let endpoints = resolve_endpoints(&env)?;
        for live in live_files {
            substitute_placeholders(live, &endpoints)?;
            tracing::info!("Updated model endpoints in {}", live.display());
            report.substituted.push(live.clone());
        }
    }

    Ok(report)
}

/// Placeholder text for an endpoint variable.
pub fn placeholder_for(var: &str) -> String {
    format!("{}_PLACEHOLDER", var)
}

fn template_path(live: &Path, environment: ConfigEnvironment) -> AppResult<PathBuf> {
    let file_name = live
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| AppError::Config(format!("Invalid config path: {}", live.display())))?;

    Ok(live.with_file_name(format!("{}.{}", file_name, environment.as_str())))
}

fn resolve_endpoints<F>(env: &F) -> AppResult<Vec<(&'static str, String)>>
where
    F: Fn(&str) -> Option<String>,
{
    let mut missing = Vec::new();
    let mut endpoints = Vec::new();

    for var in MODEL_ENDPOINT_VARS {
        match env(var).filter(|value| !value.trim().is_empty()) {
            Some(value) => endpoints.push((var, value)),
            None => missing.push(var),
        }
    }

    if !missing.is_empty() {
        return Err(AppError::Config(format!(
            "The following environment variables are not set or empty: {}",
            missing.join(", ")
        )));
    }

    Ok(endpoints)
}

fn substitute_placeholders(path: &Path, endpoints: &[(&'static str, String)]) -> AppResult<()> {
    if !path.exists() {
        return Err(AppError::Config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    let mut content = fs::read_to_string(path)?;
    for (var, value) in endpoints {
        content = content.replace(&placeholder_for(var), value);
    }
    fs::write(path, content)?;

    Ok(())
}
