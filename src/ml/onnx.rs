//! ONNX classifier backend (pure Rust via `tract-onnx`).
//!
//! Lets the service consume artifacts exported from an offline training
//! pipeline without a Python runtime in production.

use tract_onnx::prelude::*;

use crate::error::{Result, ServiceError};
use crate::features::{FeatureRow, FEATURE_NAMES};
use crate::ml::{label_from_output, Classifier};

pub struct OnnxClassifier {
    plan: TypedRunnableModel<TypedModel>,
    input_dim: usize,
}

impl std::fmt::Debug for OnnxClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxClassifier")
            .field("input_dim", &self.input_dim)
            .finish()
    }
}

impl OnnxClassifier {
    /// Load an ONNX artifact specialized to a fixed `[1, 8]` f32 input.
    pub fn load(path: &str) -> Result<Self> {
        let input_dim = FEATURE_NAMES.len();

        let model = tract_onnx::onnx()
            .model_for_path(path)
            .map_err(|e| ServiceError::ModelLoad(format!("onnx load failed: {e}")))?;

        let model = model
            .with_input_fact(
                0,
                InferenceFact::dt_shape(f32::datum_type(), tvec!(1, input_dim)),
            )
            .map_err(|e| ServiceError::ModelLoad(format!("onnx input fact failed: {e}")))?;

        let plan = model
            .into_optimized()
            .map_err(|e| ServiceError::ModelLoad(format!("onnx optimize failed: {e}")))?
            .into_runnable()
            .map_err(|e| ServiceError::ModelLoad(format!("onnx runnable failed: {e}")))?;

        // Smoke-run a dummy forward pass so shape problems fail at startup.
        let dummy = tract_ndarray::ArrayD::<f32>::zeros(tract_ndarray::IxDyn(&[1, input_dim]))
            .into_tvalue();
        let outputs = plan
            .run(tvec!(dummy))
            .map_err(|e| ServiceError::ModelLoad(format!("onnx run failed: {e}")))?;
        if outputs.is_empty() {
            return Err(ServiceError::ModelLoad(
                "onnx produced no outputs".to_string(),
            ));
        }

        Ok(Self { plan, input_dim })
    }

    fn forward(&self, input: &[f64]) -> Result<Vec<f64>> {
        let floats: Vec<f32> = input.iter().map(|v| *v as f32).collect();
        let tensor = tract_ndarray::ArrayD::<f32>::from_shape_vec(
            tract_ndarray::IxDyn(&[1, self.input_dim]),
            floats,
        )
        .map_err(|e| ServiceError::Internal(format!("onnx input reshape failed: {e}")))?
        .into_tvalue();

        let outputs = self
            .plan
            .run(tvec!(tensor))
            .map_err(|e| ServiceError::Internal(format!("onnx run failed: {e}")))?;
        if outputs.is_empty() {
            return Err(ServiceError::Internal("onnx produced no outputs".to_string()));
        }

        let arr = outputs[0]
            .to_array_view::<f32>()
            .map_err(|e| ServiceError::Internal(format!("onnx output decode failed: {e}")))?;

        Ok(arr.iter().map(|v| *v as f64).collect())
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<i64>> {
        let mut labels = Vec::with_capacity(rows.len());
        for row in rows {
            let output = self.forward(&row.as_inputs())?;
            labels.push(label_from_output(&output)?);
        }
        Ok(labels)
    }
}
