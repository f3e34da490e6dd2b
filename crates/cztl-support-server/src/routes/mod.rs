// Export route modules
pub mod messages;
pub mod quick_actions;
pub mod support;

use axum::Router;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

// Function to configure all routes
pub fn configure(state: AppState) -> Router {
    Router::new()
        .merge(messages::routes(state.clone()))
        .merge(quick_actions::routes(state.clone()))
        .merge(support::routes(state))
}
