use crate::routes::messages::dispatch_turn;
use crate::routes::ErrorResponse;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use cztl_support::quick_actions::{find_quick_action, QuickAction};

async fn list_quick_actions(State(state): State<AppState>) -> Json<Vec<QuickAction>> {
    Json(state.orchestrator.quick_actions())
}

/// Send a quick action's preset prompt as the customer's message
async fn run_quick_action(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match find_quick_action(&id) {
        Some(action) => dispatch_turn(&state, action.prompt),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!("Quick action '{}' not found", id))),
        )
            .into_response(),
    }
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/quick-actions", get(list_quick_actions))
        .route("/quick-actions/:id", post(run_quick_action))
        .with_state(state)
}
