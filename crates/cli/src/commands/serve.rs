//! Serve command handler.

use crate::bootstrap::bootstrap;
use crate::server::{serve, AppState};
use clap::Args;
use railguard_core::{config::AppConfig, AppResult};

/// Run the web UI
#[derive(Args, Debug)]
pub struct ServeCommand {
    /// Address to bind (default from config: 127.0.0.1)
    #[arg(long)]
    pub bind: Option<String>,

    /// Port to listen on (default from config: 8501)
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl ServeCommand {
    /// Execute the serve command.
    pub async fn execute(&self, mut config: AppConfig) -> AppResult<()> {
        tracing::info!("Executing serve command");

        if let Some(ref bind) = self.bind {
            config.server.bind_address = bind.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }

        let app = bootstrap(config)?;
        let bind_address = app.config.server.bind_address.clone();
        let port = app.config.server.port;

        let state = AppState::new(app)?;
        serve(state, &bind_address, port).await
    }
}
