//! Guardrail engine backends.

pub mod local;
pub mod nemo;

pub use local::LocalRails;
pub use nemo::NemoRailsClient;
