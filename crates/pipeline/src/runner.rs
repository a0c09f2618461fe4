//! The query pipeline: input rails, workflow, output rails.

use crate::checks::{check_input_guardrails, check_output_guardrails};
use crate::outcome::{millis, GuardrailMode, QueryOutcome};
use railguard_rails::Guardrails;
use railguard_workflow::Workflow;
use std::time::Instant;

/// Shown when the model refused while the agent was running.
pub const SAFETY_REFUSAL: &str = "Request was refused by the AI model for safety reasons";

/// Error fragments the agent runtime produces when the model refuses
/// instead of following the agent's output format.
const REFUSAL_ERROR_MARKERS: [&str; 2] = ["list index out of range", "Failed to parse"];

/// Result of a workflow run: whether it succeeded and the answer or error text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowRun {
    pub success: bool,
    pub result: String,
    pub elapsed_ms: u64,
}

/// Run the workflow, turning failures into display text.
pub async fn run_workflow(workflow: &dyn Workflow, user_input: &str) -> WorkflowRun {
    let started = Instant::now();
    let result = workflow.run(user_input).await;
    let elapsed_ms = millis(started.elapsed());
    tracing::info!(elapsed_ms, workflow = workflow.name(), "Workflow execution finished");

    match result {
        Ok(answer) => WorkflowRun {
            success: true,
            result: answer,
            elapsed_ms,
        },
        Err(e) => {
            let error = e.to_string();
            tracing::warn!("Workflow failed: {}", error);
            let result = if REFUSAL_ERROR_MARKERS.iter().any(|m| error.contains(m)) {
                SAFETY_REFUSAL.to_string()
            } else {
                format!("Error: {}", error)
            };
            WorkflowRun {
                success: false,
                result,
                elapsed_ms,
            }
        }
    }
}

/// Whether a successful workflow answer is really a refusal that slipped
/// past the agent's output parser.
pub fn is_refused_answer(answer: &str) -> bool {
    let lowered = answer.to_lowercase();
    answer.contains("Invalid Format") && (lowered.contains("can't") || lowered.contains("illegal"))
}

/// Build the `prompt` span a query runs in.
pub fn prompt_span(service_name: &str, mode: GuardrailMode) -> tracing::Span {
    tracing::info_span!(
        "prompt",
        otel.kind = "server",
        service.name = %service_name,
        guardrails = %mode
    )
}

/// Process one query.
///
/// With guardrails enabled the input is checked first and a refusal ends
/// the query. The workflow runs next; a failure (or a refusal disguised as
/// an answer) ends the query. Finally the answer is checked and becomes the
/// final result only when it passes. With guardrails disabled both checks
/// are skipped and count as passed.
///
/// `rails` may be `None` only when guardrails are disabled; an enabled
/// query without rails is blocked at the input check.
pub async fn process_query(
    user_input: &str,
    mode: GuardrailMode,
    rails: Option<&dyn Guardrails>,
    workflow: &dyn Workflow,
) -> QueryOutcome {
    tracing::info!("Processing {} query", mode.label().to_lowercase());
    tracing::debug!("Query: {}", user_input);

    let mut outcome = QueryOutcome::default();

    // Step 1: input rails
    if mode.is_enabled() {
        let Some(rails) = rails else {
            outcome.input_message = "Error checking input: guardrails not initialized".to_string();
            return outcome;
        };
        tracing::info!("Running input guardrails");
        let verdict = check_input_guardrails(rails, user_input).await;
        outcome.input_safe = verdict.safe;
        outcome.input_message = verdict.message;
        outcome.timings.input_guardrails_ms = Some(verdict.elapsed_ms);
        if !outcome.input_safe {
            tracing::info!("Input blocked by guardrails");
            return outcome;
        }
    } else {
        outcome.input_safe = true;
    }

    // Step 2: workflow
    tracing::info!("Running workflow");
    let run = run_workflow(workflow, user_input).await;
    outcome.workflow_success = run.success;
    outcome.workflow_result = run.result;
    outcome.timings.workflow_ms = Some(run.elapsed_ms);
    if !outcome.workflow_success {
        return outcome;
    }

    if is_refused_answer(&outcome.workflow_result) {
        tracing::info!("Workflow answer is a model refusal");
        outcome.workflow_success = false;
        outcome.workflow_result = format!(
            "(workflow) {}. Details: {}",
            SAFETY_REFUSAL, outcome.workflow_result
        );
        return outcome;
    }

    // Step 3: output rails
    match (mode, rails) {
        (GuardrailMode::Enabled, Some(rails)) => {
            tracing::info!("Running output guardrails");
            let verdict =
                check_output_guardrails(rails, user_input, &outcome.workflow_result).await;
            outcome.output_safe = verdict.safe;
            outcome.output_message = verdict.message;
            outcome.timings.output_guardrails_ms = Some(verdict.elapsed_ms);
            if outcome.output_safe {
                outcome.final_result = outcome.workflow_result.clone();
            } else {
                tracing::info!("Output blocked by guardrails");
            }
        }
        _ => {
            outcome.output_safe = true;
            outcome.final_result = outcome.workflow_result.clone();
        }
    }

    outcome
}
