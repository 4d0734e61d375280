//! HTTP access to a conference table.
//!
//! This crate provides both sides of the HTTP deployment mode:
//!
//! - [`WebServer`]: an Axum service exposing an injected
//!   [`ConferenceTable`](conftable_store::ConferenceTable) (normally a
//!   [`MemoryConference`](conftable_store::MemoryConference)) as JSON
//!   endpoints.
//! - [`RemoteConference`]: a `reqwest` client that implements
//!   `ConferenceTable` against a running service.

pub mod api;
pub mod client;
pub mod server;
pub mod state;

pub use client::RemoteConference;
pub use server::WebServer;
pub use state::AppState;

/// Web server configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// The address to bind the HTTP server to.
    pub bind_addr: String,
    /// The port to listen on.
    pub port: u16,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".into(),
            port: 5001,
        }
    }
}
