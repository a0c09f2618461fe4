//! Query handling shared by the HTML and JSON routes.

use super::AppState;
use axum::http::StatusCode;
use railguard_core::AppError;
use railguard_pipeline::{process_query, prompt_span, GuardrailMode, QueryOutcome};
use railguard_workflow::open_workflow;
use tracing::Instrument;

/// Why a query was not run.
#[derive(Debug)]
pub enum QueryError {
    Blank,
    GuardrailsUnavailable,
    Workflow(String),
}

impl QueryError {
    pub fn message(&self) -> String {
        match self {
            Self::Blank => "Please enter a question".to_string(),
            Self::GuardrailsUnavailable => {
                "Cannot process query: Guardrails not initialized".to_string()
            }
            Self::Workflow(message) => message.clone(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Blank => StatusCode::BAD_REQUEST,
            Self::GuardrailsUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Workflow(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Run one query for a session and record an answered one in its history.
pub async fn run_query(
    state: &AppState,
    session: &str,
    question: &str,
    mode: GuardrailMode,
) -> Result<QueryOutcome, QueryError> {
    if question.trim().is_empty() {
        return Err(QueryError::Blank);
    }

    if state.rails.is_none() {
        tracing::warn!("Guardrails not initialized, refusing query");
        return Err(QueryError::GuardrailsUnavailable);
    }

    let (_, workflow) = open_workflow(&state.config).map_err(|e| match e {
        AppError::Workflow(message) => QueryError::Workflow(message),
        other => QueryError::Workflow(other.to_string()),
    })?;

    let outcome = process_query(question, mode, state.rails.as_deref(), &workflow)
        .instrument(prompt_span(&state.service_name, mode))
        .await;

    if outcome.has_answer() {
        state
            .sessions
            .record(session, question, &outcome.final_result, mode);
    }

    Ok(outcome)
}
