//! Ask command handler.
//!
//! Runs one query through the pipeline from the terminal.

use crate::bootstrap::bootstrap;
use crate::report::notices;
use clap::Args;
use railguard_core::{config::AppConfig, AppError, AppResult};
use railguard_pipeline::{process_query, prompt_span, GuardrailMode};
use railguard_workflow::open_workflow;
use std::path::PathBuf;
use tracing::Instrument;

/// Ask a question through the pipeline
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: Option<String>,

    /// Read the question from a file
    #[arg(short, long, conflicts_with = "question")]
    pub file: Option<PathBuf>,

    /// Run the input and output guardrails
    #[arg(short, long)]
    pub guardrails: bool,

    /// Output the outcome as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let question = self.get_question()?;
        let mode = GuardrailMode::from_flag(self.guardrails);

        let app = bootstrap(config)?;
        if app.rails.is_none() {
            return Err(AppError::Guardrails(
                "Cannot process query: Guardrails not initialized".to_string(),
            ));
        }

        let (_, workflow) = open_workflow(&app.config)?;

        let outcome = process_query(&question, mode, app.rails.as_deref(), &workflow)
            .instrument(prompt_span(&app.service_name, mode))
            .await;

        if self.json {
            let json = serde_json::to_string_pretty(&outcome)?;
            println!("{}", json);
            return Ok(());
        }

        for notice in notices(&outcome, mode) {
            eprintln!("[{}] {}", notice.level.as_str(), notice.text);
        }
        if outcome.has_answer() {
            println!("{}", outcome.final_result);
        }

        Ok(())
    }

    /// Get the question from the argument or the file.
    fn get_question(&self) -> AppResult<String> {
        let question = match (&self.question, &self.file) {
            (Some(question), _) => question.clone(),
            (None, Some(path)) => std::fs::read_to_string(path).map_err(|e| {
                AppError::Config(format!("Failed to read question file {:?}: {}", path, e))
            })?,
            (None, None) => String::new(),
        };

        if question.trim().is_empty() {
            return Err(AppError::Config("No question provided".to_string()));
        }
        Ok(question)
    }
}
