//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use std::sync::Arc;

use qa_checklist_core::{HistoryManager, SessionManager};

use crate::config::Config;

/// The shared application state, created once at startup and passed to all
/// handlers. The managers own the two persistent documents; everything the
/// handlers do goes through them.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionManager>,
    pub history: Arc<HistoryManager>,
    pub config: Arc<Config>,
}
