use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use tracing::{debug, warn};

use crate::api::state::AppState;
use crate::api::types::{PredictionEntry, PredictionRequest};
use crate::error::PredictError;
use crate::features::FeatureRow;

/// POST /diabetesPrediction
///
/// The body is taken as raw bytes and parsed here rather than through the
/// `Json` extractor so malformed input maps onto our own error taxonomy.
pub async fn diabetes_prediction(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Vec<PredictionEntry>>, PredictError> {
    let request: PredictionRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!("rejected prediction request: {e}");
        PredictError::InputFormat(e.to_string())
    })?;

    let mut rows = Vec::with_capacity(request.data.len());
    for (index, record) in request.data.iter().enumerate() {
        rows.push(FeatureRow::from_record(index, record).inspect_err(|e| {
            warn!("rejected prediction request: {e}");
        })?);
    }

    // Empty batch short-circuits; the model never sees it.
    if rows.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let labels = state.model.predict(&rows).map_err(|e| {
        warn!("inference failed for batch of {}: {e}", rows.len());
        PredictError::ModelInference(e.to_string())
    })?;

    if labels.len() != rows.len() {
        return Err(PredictError::ModelInference(format!(
            "model returned {} labels for {} records",
            labels.len(),
            rows.len()
        )));
    }

    debug!(records = rows.len(), "served prediction batch");

    Ok(Json(
        labels
            .into_iter()
            .map(|result| PredictionEntry { result })
            .collect(),
    ))
}
