//! Shared state for the web server.

use crate::session::SessionStore;

/// One instance per server process, shared across handlers via `Arc`.
pub struct AppState {
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            sessions: SessionStore::new(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
