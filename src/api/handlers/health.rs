use crate::{AppState, types::HealthResponse};
use axum::{Json, extract::State};

/// Liveness probe with a little process information.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        started_at: state.started_at,
        conversations: state.store.len(),
    })
}
