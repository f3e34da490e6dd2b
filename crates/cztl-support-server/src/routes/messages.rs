use crate::routes::ErrorResponse;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use cztl_support::orchestrator::{ChatState, IgnoreReason};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct SubmitRequest {
    pub text: String,
}

async fn list_messages(State(state): State<AppState>) -> Json<ChatState> {
    Json(state.orchestrator.state())
}

async fn submit_message(
    State(state): State<AppState>,
    Json(request): Json<SubmitRequest>,
) -> Response {
    dispatch_turn(&state, &request.text)
}

/// Accept a turn and let it run in the background
///
/// Replies `202` with the state including the new user message. The browser
/// polls `GET /messages` until `busy` clears.
pub(crate) fn dispatch_turn(state: &AppState, text: &str) -> Response {
    match state.orchestrator.begin(text) {
        Ok(turn) => {
            tokio::spawn(async move {
                let outcome = turn.run().await;
                tracing::info!(?outcome, "turn finished");
            });
            (StatusCode::ACCEPTED, Json(state.orchestrator.state())).into_response()
        }
        Err(IgnoreReason::EmptyInput) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Message text is empty")),
        )
            .into_response(),
        Err(IgnoreReason::Busy) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse::new("A reply is still being generated")),
        )
            .into_response(),
    }
}

// Configure routes for this module
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/messages", get(list_messages).post(submit_message))
        .with_state(state)
}
