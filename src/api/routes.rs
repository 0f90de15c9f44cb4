use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::api::{handlers, state::AppState};

pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Prediction endpoint
        .route("/diabetesPrediction", post(handlers::diabetes_prediction))
        // Probe endpoints
        .route("/healthz", get(handlers::liveness_handler))
        .route("/readyz", get(handlers::readiness_handler))
        // Add state and CORS
        .with_state(state)
        .layer(cors)
}
