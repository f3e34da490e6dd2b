use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct SupportResponse {
    url: String,
}

/// Where the "Advanced Support" button sends the customer
async fn support_link(State(state): State<AppState>) -> Json<SupportResponse> {
    Json(SupportResponse {
        url: state.support_url,
    })
}

async fn status() -> &'static str {
    "ok"
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/support", get(support_link))
        .route("/status", get(status))
        .with_state(state)
}
