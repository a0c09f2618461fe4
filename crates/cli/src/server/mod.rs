//! Web server: the HTML UI, its JSON equivalents, health, and the rail
//! actions endpoint.

mod actions;
mod api;
mod query;
mod session;
mod ui;

use crate::bootstrap::Application;
use axum::{
    routing::{get, post},
    Router,
};
use handlebars::Handlebars;
use railguard_core::{AppConfig, AppError, AppResult};
use railguard_rails::Guardrails;
use serde::Serialize;
use session::SessionStore;
use std::sync::Arc;

const INDEX_TEMPLATE: &str = include_str!("../../templates/index.hbs");

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    config: Arc<AppConfig>,
    service_name: Arc<str>,
    rails: Option<Arc<dyn Guardrails>>,
    templates: Arc<Handlebars<'static>>,
    sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(app: Application) -> AppResult<Self> {
        let mut templates = Handlebars::new();
        templates
            .register_template_string("index", INDEX_TEMPLATE)
            .map_err(|e| AppError::Server(format!("Failed to register template: {}", e)))?;

        Ok(Self {
            config: Arc::new(app.config),
            service_name: Arc::from(app.service_name),
            rails: app.rails,
            templates: Arc::new(templates),
            sessions: Arc::new(SessionStore::new()),
        })
    }

    fn render<T: Serialize>(&self, name: &str, data: &T) -> AppResult<String> {
        self.templates
            .render(name, data)
            .map_err(|e| AppError::Server(format!("Failed to render template: {}", e)))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(ui::index))
        .route("/query", post(ui::submit))
        .route("/history/clear", post(ui::clear_history))
        .route("/api/query", post(api::query))
        .route("/api/history", get(api::history).delete(api::clear_history))
        .route("/health", get(api::health))
        .route("/v1/actions/run", post(actions::run_action))
        .route("/v1/actions/list", get(actions::list_actions))
        .with_state(state)
}

/// Serve until Ctrl-C.
pub async fn serve(state: AppState, bind_address: &str, port: u16) -> AppResult<()> {
    let address = format!("{}:{}", bind_address, port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|e| AppError::Server(format!("Failed to bind {}: {}", address, e)))?;

    tracing::info!(bind_address = %address, "Web server started");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Server(format!("Server terminated unexpectedly: {}", e)))?;

    tracing::info!("Web server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
