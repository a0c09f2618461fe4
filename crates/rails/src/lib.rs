//! Guardrail engine access for Railguard.
//!
//! This crate puts the guardrail engines behind one trait-based interface
//! and carries the heuristic rail actions.
//!
//! # Backends
//! - **nemo**: a NeMo Guardrails server reached over HTTP (default)
//! - **local**: the rail actions evaluated in-process
//!
//! # Example
//! ```no_run
//! use railguard_rails::{ChatMessage, Guardrails, NemoRailsClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let rails = NemoRailsClient::new("http://localhost:8080", Some("guardrails_config".into()), None)?;
//! let output = rails.generate(&[ChatMessage::user("What is APM?")]).await?;
//! println!("{:?}", output);
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod client;
pub mod factory;
pub mod providers;

// Re-export main types
pub use actions::{ActionContext, RailAction};
pub use client::{ChatMessage, Guardrails, RailsMessage, RailsOutput, RailsRequest, Role};
pub use factory::create_rails;
pub use providers::{LocalRails, NemoRailsClient};
