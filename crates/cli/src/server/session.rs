//! Cookie-keyed conversation histories.

use axum::http::{header, HeaderMap, HeaderName};
use railguard_pipeline::{ConversationHistory, GuardrailMode};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

pub const SESSION_COOKIE: &str = "railguard_session";

/// Session store. The lock is only taken for synchronous reads and writes.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, ConversationHistory>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, ConversationHistory>> {
        self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Copy of a session's history; empty for unknown sessions.
    pub fn history(&self, session: &str) -> ConversationHistory {
        self.lock().get(session).cloned().unwrap_or_default()
    }

    pub fn record(&self, session: &str, question: &str, answer: &str, mode: GuardrailMode) {
        self.lock()
            .entry(session.to_string())
            .or_default()
            .push(question, answer, mode);
    }

    /// Forget a session's history entirely.
    pub fn clear(&self, session: &str) {
        self.lock().remove(session);
    }
}

/// The caller's session id, and the cookie to set when a new one was issued.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub issued: bool,
}

impl Session {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        match session_cookie(headers) {
            Some(id) => Self { id, issued: false },
            None => Self {
                id: uuid::Uuid::new_v4().to_string(),
                issued: true,
            },
        }
    }

    /// `Set-Cookie` header for a newly issued session.
    pub fn set_cookie(&self) -> Option<(HeaderName, String)> {
        self.issued.then(|| {
            (
                header::SET_COOKIE,
                format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, self.id),
            )
        })
    }
}

fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}
