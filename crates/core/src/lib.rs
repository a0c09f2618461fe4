//! Railguard Core Library
//!
//! Foundational utilities shared by the Railguard crates:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management
//! - Switching config files between deployment environments

pub mod config;
pub mod environments;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, AppResult};
