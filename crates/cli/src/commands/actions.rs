//! Actions command handler.

use clap::Args;
use railguard_core::{config::AppConfig, AppResult};
use railguard_rails::RailAction;

/// List the rail actions
#[derive(Args, Debug)]
pub struct ActionsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ActionsCommand {
    /// Execute the actions command.
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let names: Vec<&str> = RailAction::ALL.iter().map(|action| action.name()).collect();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&names)?);
            return Ok(());
        }

        for name in names {
            let mut phases = Vec::new();
            if config.guardrails.input_actions.iter().any(|a| a == name) {
                phases.push("input");
            }
            if config.guardrails.output_actions.iter().any(|a| a == name) {
                phases.push("output");
            }

            if phases.is_empty() {
                println!("{}", name);
            } else {
                println!("{} ({})", name, phases.join(", "));
            }
        }

        Ok(())
    }
}
