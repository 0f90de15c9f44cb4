//! Model loading and batch inference.
//!
//! The service treats the model as an opaque collaborator behind the
//! [`Classifier`] trait: loaded once at startup, shared read-only across
//! requests, substitutable with a stub in tests.

pub mod dense;
#[cfg(feature = "onnx")]
pub mod onnx;

pub use dense::{Activation, DenseClassifier, DenseLayer};
#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;

use std::path::Path;
use std::sync::Arc;

use crate::config::ModelConfig;
use crate::error::{Result, ServiceError};
use crate::features::FeatureRow;

/// Batch prediction seam between the HTTP layer and the loaded model.
///
/// Implementations must be safe to call concurrently without coordination;
/// nothing here mutates after load.
pub trait Classifier: Send + Sync {
    /// Predict one class label per row, preserving row order.
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<i64>>;
}

/// Load the configured model artifact. Fatal on any failure: the server
/// must not start serving without a model.
pub fn load_classifier(config: &ModelConfig) -> Result<Arc<dyn Classifier>> {
    let path = Path::new(&config.path);
    match path.extension().and_then(|e| e.to_str()) {
        Some("onnx") => load_onnx(&config.path),
        _ => {
            let model = DenseClassifier::from_file(path)?;
            tracing::info!(path = %config.path, "loaded dense model artifact");
            Ok(Arc::new(model))
        }
    }
}

#[cfg(feature = "onnx")]
fn load_onnx(path: &str) -> Result<Arc<dyn Classifier>> {
    let model = OnnxClassifier::load(path)?;
    tracing::info!(path = %path, "loaded onnx model artifact");
    Ok(Arc::new(model))
}

#[cfg(not(feature = "onnx"))]
fn load_onnx(path: &str) -> Result<Arc<dyn Classifier>> {
    Err(ServiceError::ModelLoad(format!(
        "{path}: onnx artifacts require building with the `onnx` feature"
    )))
}

/// Map a raw model output vector to a class label.
///
/// Scalar outputs are treated as a positive-class probability (0.5
/// threshold); vector outputs as per-class scores (argmax).
pub(crate) fn label_from_output(output: &[f64]) -> Result<i64> {
    match output.len() {
        0 => Err(ServiceError::Internal(
            "model produced an empty output".to_string(),
        )),
        1 => Ok(if output[0] >= 0.5 { 1 } else { 0 }),
        _ => {
            let mut best = 0;
            for (idx, score) in output.iter().enumerate() {
                if *score > output[best] {
                    best = idx;
                }
            }
            Ok(best as i64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_output_thresholds_at_half() {
        assert_eq!(label_from_output(&[0.49]).unwrap(), 0);
        assert_eq!(label_from_output(&[0.5]).unwrap(), 1);
        assert_eq!(label_from_output(&[0.93]).unwrap(), 1);
    }

    #[test]
    fn vector_output_takes_argmax() {
        assert_eq!(label_from_output(&[0.1, 0.7, 0.2]).unwrap(), 1);
        assert_eq!(label_from_output(&[0.9, 0.05, 0.05]).unwrap(), 0);
    }

    #[test]
    fn empty_output_is_an_error() {
        assert!(label_from_output(&[]).is_err());
    }
}
