//! JSON routes.

use super::query::run_query;
use super::session::Session;
use super::AppState;
use crate::report::{notices, Notice};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse, Response},
    Json,
};
use railguard_pipeline::{GuardrailMode, HistoryEntry, QueryOutcome};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub question: String,
    #[serde(default)]
    pub mode: GuardrailMode,
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub mode: GuardrailMode,
    pub outcome: QueryOutcome,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub entries: Vec<HistoryEntry>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: String,
    pub guardrails: String,
}

pub async fn query(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<QueryRequest>,
) -> Response {
    let session = Session::from_headers(&headers);
    let cookie = AppendHeaders(session.set_cookie());

    match run_query(&state, &session.id, &request.question, request.mode).await {
        Ok(outcome) => {
            let body = QueryResponse {
                mode: request.mode,
                notices: notices(&outcome, request.mode),
                outcome,
            };
            (cookie, Json(body)).into_response()
        }
        Err(e) => (
            e.status(),
            cookie,
            Json(ApiError {
                error: e.message(),
            }),
        )
            .into_response(),
    }
}

pub async fn history(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = Session::from_headers(&headers);
    let entries = state.sessions.history(&session.id).entries();
    (
        AppendHeaders(session.set_cookie()),
        Json(HistoryResponse { entries }),
    )
        .into_response()
}

pub async fn clear_history(State(state): State<AppState>, headers: HeaderMap) -> StatusCode {
    let session = Session::from_headers(&headers);
    state.sessions.clear(&session.id);
    StatusCode::NO_CONTENT
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let guardrails = state
        .rails
        .as_ref()
        .map(|rails| rails.backend_name().to_string())
        .unwrap_or_else(|| "unavailable".to_string());

    Json(HealthResponse {
        status: "ok",
        service: state.service_name.to_string(),
        guardrails,
    })
}
