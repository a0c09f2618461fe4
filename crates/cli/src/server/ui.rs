//! HTML page handlers.

use super::query::{run_query, QueryError};
use super::session::Session;
use super::AppState;
use crate::report::{notices, Notice};
use axum::{
    extract::{Form, State},
    http::{HeaderMap, StatusCode},
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
};
use railguard_pipeline::{GuardrailMode, HistoryEntry};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct QueryForm {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub mode: Option<String>,
}

#[derive(Debug, Serialize)]
struct ModeOption {
    value: &'static str,
    label: &'static str,
    selected: bool,
}

#[derive(Debug, Serialize)]
struct PageView {
    service_name: String,
    guardrails_ready: bool,
    question: String,
    modes: Vec<ModeOption>,
    notices: Vec<Notice>,
    response: Option<String>,
    history: Vec<HistoryEntry>,
}

impl PageView {
    fn new(state: &AppState, mode: GuardrailMode) -> Self {
        Self {
            service_name: state.service_name.to_string(),
            guardrails_ready: state.rails.is_some(),
            question: String::new(),
            modes: GuardrailMode::OPTIONS
                .iter()
                .map(|option| ModeOption {
                    value: option.as_str(),
                    label: option.label(),
                    selected: *option == mode,
                })
                .collect(),
            notices: Vec::new(),
            response: None,
            history: Vec::new(),
        }
    }
}

pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = Session::from_headers(&headers);
    let mut view = PageView::new(&state, GuardrailMode::default());
    view.history = state.sessions.history(&session.id).entries();
    render_page(&state, &session, &view)
}

pub async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<QueryForm>,
) -> Response {
    let session = Session::from_headers(&headers);
    let mode = form
        .mode
        .as_deref()
        .and_then(GuardrailMode::parse)
        .unwrap_or_default();

    let mut view = PageView::new(&state, mode);
    view.question = form.question.clone();

    match run_query(&state, &session.id, &form.question, mode).await {
        Ok(outcome) => {
            view.notices = notices(&outcome, mode);
            if outcome.has_answer() {
                view.response = Some(outcome.final_result);
            }
        }
        Err(QueryError::Blank) => {}
        Err(e) => view.notices.push(Notice::error(e.message())),
    }

    view.history = state.sessions.history(&session.id).entries();
    render_page(&state, &session, &view)
}

pub async fn clear_history(State(state): State<AppState>, headers: HeaderMap) -> Redirect {
    let session = Session::from_headers(&headers);
    state.sessions.clear(&session.id);
    tracing::debug!("Cleared history for session {}", session.id);
    Redirect::to("/")
}

fn render_page(state: &AppState, session: &Session, view: &PageView) -> Response {
    match state.render("index", view) {
        Ok(html) => (AppendHeaders(session.set_cookie()), Html(html)).into_response(),
        Err(e) => {
            tracing::error!("{}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<h1>Template Error</h1>".to_string()),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{body_text, send, state, with_session};
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };

    fn form(body: &str) -> Request<Body> {
        with_session(Request::builder().method("POST").uri("/query"))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_index_issues_session_cookie() {
        let (_dir, state) = state(true).await;
        let response = send(&state, Request::get("/").body(Body::empty()).unwrap()).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(header::SET_COOKIE));
        let html = body_text(response).await;
        assert!(html.contains("railguard-test"));
        assert!(html.contains("Without guardrails"));
    }

    #[tokio::test]
    async fn test_submit_renders_answer_and_history() {
        let (_dir, state) = state(true).await;

        let response = send(&state, form("question=what+is+apm&mode=enabled")).await;
        let html = body_text(response).await;
        assert!(html.contains("Input passed safety checks"));
        assert!(html.contains("Workflow completed successfully"));
        assert!(html.contains("Output passed safety checks"));
        assert!(html.contains("answer: what is apm"));
        assert!(html.contains("Q1: what is apm..."));
    }

    #[tokio::test]
    async fn test_submit_blocked_input() {
        let (_dir, state) = state(true).await;

        let response = send(&state, form("question=what+about+trump&mode=enabled")).await;
        let html = body_text(response).await;
        assert!(html.contains("Input Blocked: I"));
        assert!(html.contains("cannot discuss political topics."));
        assert!(!html.contains("Q1:"));
    }

    #[tokio::test]
    async fn test_submit_without_rails_refuses_every_mode() {
        let (_dir, state) = state(false).await;

        for body in ["question=hi&mode=enabled", "question=hi&mode=disabled"] {
            let html = body_text(send(&state, form(body)).await).await;
            assert!(html.contains("Cannot process query: Guardrails not initialized"));
            assert!(!html.contains("answer: hi"));
        }
        assert!(state.sessions.history("test-session").is_empty());
    }

    #[tokio::test]
    async fn test_blank_question_is_ignored() {
        let (_dir, state) = state(true).await;

        let html = body_text(send(&state, form("question=+++&mode=disabled")).await).await;
        assert!(!html.contains("Workflow completed"));
        assert!(state.sessions.history("test-session").is_empty());
    }

    #[tokio::test]
    async fn test_user_text_is_escaped() {
        let (_dir, state) = state(true).await;

        let html = body_text(
            send(&state, form("question=%3Cscript%3Ealert(1)%3C%2Fscript%3E&mode=disabled")).await,
        )
        .await;
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[tokio::test]
    async fn test_clear_history_redirects() {
        let (_dir, state) = state(true).await;
        send(&state, form("question=hi&mode=disabled")).await;
        assert_eq!(state.sessions.history("test-session").len(), 1);

        let request = with_session(Request::builder().method("POST").uri("/history/clear"))
            .body(Body::empty())
            .unwrap();
        let response = send(&state, request).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(state.sessions.history("test-session").is_empty());
    }
}
