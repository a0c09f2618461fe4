//! Query pipeline for Railguard.
//!
//! Runs a user query through input guardrails, the agent workflow and
//! output guardrails, and keeps the per-session conversation history.
//!
//! # Example
//! ```no_run
//! use railguard_pipeline::{process_query, GuardrailMode};
//! use railguard_workflow::HttpWorkflow;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let workflow = HttpWorkflow::new("react_agent", "http://localhost:8000", None)?;
//! let outcome = process_query("What is APM?", GuardrailMode::Disabled, None, &workflow).await;
//! println!("{}", outcome.final_result);
//! # Ok(())
//! # }
//! ```

pub mod checks;
pub mod history;
pub mod outcome;
pub mod runner;

// Re-export main types
pub use checks::{check_input_guardrails, check_output_guardrails, CheckVerdict};
pub use history::{ConversationHistory, Exchange, HistoryEntry};
pub use outcome::{GuardrailMode, QueryOutcome, StageTimings};
pub use runner::{process_query, prompt_span, run_workflow, WorkflowRun, SAFETY_REFUSAL};
