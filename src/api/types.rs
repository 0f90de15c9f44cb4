use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PredictError;

// ============================================================================
// Prediction Types
// ============================================================================

/// Label under which each prediction is returned, fixed by the original
/// service contract.
///
/// Must stay in sync with the `#[serde(rename = ...)]` on
/// [`PredictionEntry::result`]; the serialization test below guards the
/// pairing.
pub const RESULT_LABEL: &str = "Based on your test report, the diabetes result is:";

/// Body of `POST /diabetesPrediction`: a batch of raw feature records.
#[derive(Debug, Deserialize)]
pub struct PredictionRequest {
    pub data: Vec<serde_json::Map<String, Value>>,
}

/// One prediction, keyed by the fixed result label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionEntry {
    #[serde(rename = "Based on your test report, the diabetes result is:")]
    pub result: i64,
}

// ============================================================================
// Health Check Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_seconds: i64,
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for PredictError {
    fn into_response(self) -> Response {
        let status = match &self {
            PredictError::InputFormat(_) => StatusCode::BAD_REQUEST,
            PredictError::TypeCoercion { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            PredictError::ModelInference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorResponse {
            error: self.kind().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
