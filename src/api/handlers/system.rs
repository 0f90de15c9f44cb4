use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::api::state::AppState;
use crate::api::types::HealthResponse;

/// GET /healthz - liveness probe, is the process alive?
pub async fn liveness_handler() -> impl IntoResponse {
    StatusCode::OK
}

/// GET /readyz - readiness probe. The model is loaded before the listener
/// binds, so a serving process is always ready.
pub async fn readiness_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            uptime_seconds: state.uptime_seconds(),
        }),
    )
}
