//! Shared application state for the web server.
//!
//! [`AppState`] is wrapped in an `Arc` and shared across all request
//! handlers. The table is created by whoever starts the server and lives
//! exactly as long as the server does.

use std::sync::Arc;

use conftable_store::ConferenceTable;

/// Shared state accessible from every Axum handler.
#[derive(Clone)]
pub struct AppState {
    /// The table every endpoint reads and writes.
    pub table: Arc<dyn ConferenceTable>,
}

impl AppState {
    pub fn new(table: Arc<dyn ConferenceTable>) -> Self {
        Self { table }
    }
}
