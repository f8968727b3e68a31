use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::AppState;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service and side-effect worker are running"),
        (status = 503, description = "Side-effect worker has stopped")
    )
)]
#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let dispatcher_running = state.dispatcher.is_running();
    let status = if dispatcher_running {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let body = json!({
        "status": if dispatcher_running { "ok" } else { "degraded" },
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "dispatcher": if dispatcher_running { "running" } else { "stopped" },
    });
    (status, Json(body))
}
