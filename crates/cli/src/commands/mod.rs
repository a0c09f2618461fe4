//! Command handlers for the Railguard CLI.

pub mod actions;
pub mod ask;
pub mod configure;
pub mod serve;

// Re-export command types for convenience
pub use actions::ActionsCommand;
pub use ask::AskCommand;
pub use configure::ConfigureCommand;
pub use serve::ServeCommand;
