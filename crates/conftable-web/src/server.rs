//! Main web server setup and startup.
//!
//! [`WebServer`] composes the Axum router over an injected table and runs
//! the HTTP listener until its shutdown token is cancelled.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use conftable_store::ConferenceTable;

use crate::WebConfig;
use crate::api;
use crate::state::AppState;

/// The conference table web server.
pub struct WebServer {
    config: WebConfig,
    state: Arc<AppState>,
}

impl WebServer {
    /// Create a new web server.
    ///
    /// # Arguments
    ///
    /// * `config` - Bind address and port configuration.
    /// * `table` - The table served by every endpoint.
    pub fn new(config: WebConfig, table: Arc<dyn ConferenceTable>) -> Self {
        let state = Arc::new(AppState::new(table));
        Self { config, state }
    }

    /// Return the `host:port` string this server will bind to.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.config.bind_addr, self.config.port)
    }

    /// The table this server exposes.
    pub fn table(&self) -> Arc<dyn ConferenceTable> {
        Arc::clone(&self.state.table)
    }

    /// Build the Axum router with all routes registered.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/ping", get(api::ping))
            .route("/join", post(api::join))
            .route("/post", post(api::post))
            .route("/messages", get(api::messages))
            .route("/conclude", post(api::conclude))
            .route("/status", get(api::status))
            .with_state(Arc::clone(&self.state))
    }

    /// Bind the configured address and serve until `shutdown` is cancelled.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP listener cannot be bound.
    pub async fn start(
        self,
        shutdown: CancellationToken,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = self.addr();
        let listener = TcpListener::bind(&addr).await?;
        self.serve(listener, shutdown).await?;
        Ok(())
    }

    /// Serve on an already bound listener until `shutdown` is cancelled.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: CancellationToken,
    ) -> std::io::Result<()> {
        let router = self.router();
        let local = listener.local_addr()?;
        tracing::info!(addr = %local, "conference table is open");

        axum::serve(listener, router)
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await?;

        tracing::info!(addr = %local, "conference table closed");
        Ok(())
    }
}
