//! Shared API state.

use dealdesk_application::ScopeService;

/// Application state shared across request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Scope resolution service.
    pub scope_service: ScopeService,
}
