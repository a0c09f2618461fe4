//! Error types for Railguard.
//!
//! A single error enum covers configuration, I/O, guardrail engine,
//! workflow runtime and web server failures.

use thiserror::Error;

/// Unified error type for Railguard.
///
/// Library functions return `Result<T, AppError>`. The query pipeline turns
/// these into display strings instead of propagating them, see
/// `railguard_pipeline`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Guardrail engine errors
    #[error("Guardrails error: {0}")]
    Guardrails(String),

    /// Agent workflow errors
    #[error("Workflow error: {0}")]
    Workflow(String),

    /// Web server errors
    #[error("Server error: {0}")]
    Server(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
