//! Configure command handler.
//!
//! Switches the live guardrails and workflow config files to one of the
//! deployment environments.

use clap::{Args, ValueEnum};
use railguard_core::config::AppConfig;
use railguard_core::environments::{switch_environment, ConfigEnvironment};
use railguard_core::AppResult;

/// Deployment environment to configure for
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    /// Locally hosted models
    Local,
    /// Hosted API endpoints
    Build,
    /// Model endpoints from NVIDIA_MODEL_ENDPOINT_8001..8004
    Brev,
}

impl From<Environment> for ConfigEnvironment {
    fn from(environment: Environment) -> Self {
        match environment {
            Environment::Local => ConfigEnvironment::Local,
            Environment::Build => ConfigEnvironment::Build,
            Environment::Brev => ConfigEnvironment::Brev,
        }
    }
}

/// Switch config files to an environment
#[derive(Args, Debug)]
pub struct ConfigureCommand {
    /// Target environment
    #[arg(value_enum)]
    pub environment: Environment,
}

impl ConfigureCommand {
    /// Execute the configure command.
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let environment = ConfigEnvironment::from(self.environment);
        tracing::info!("Configuring for {} environment", environment.as_str());

        let report = switch_environment(&config.live_config_files(), environment, |key| {
            std::env::var(key).ok()
        })?;

        for (template, live) in &report.copied {
            println!("Copied {} -> {}", template.display(), live.display());
        }
        for live in &report.substituted {
            println!("Updated model endpoints in {}", live.display());
        }
        println!("Configuration updated for {} environment", environment.as_str());

        Ok(())
    }
}
