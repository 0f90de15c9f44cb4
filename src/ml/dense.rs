//! Dense neural network classifier (CPU-only).
//!
//! The production artifact is a small MLP serialized as JSON by the offline
//! training pipeline. Shapes are validated eagerly at load so a broken
//! artifact fails process startup instead of the first request.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, ServiceError};
use crate::features::{FeatureRow, FEATURE_NAMES};
use crate::ml::{label_from_output, Classifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Linear,
    Relu,
    Tanh,
    Sigmoid,
}

impl Default for Activation {
    fn default() -> Self {
        Self::Linear
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseLayer {
    /// Weights shape: [out_dim][in_dim]
    pub weights: Vec<Vec<f64>>,
    /// Bias shape: [out_dim]
    pub bias: Vec<f64>,
    #[serde(default)]
    pub activation: Activation,
}

impl DenseLayer {
    fn in_dim(&self) -> usize {
        self.weights.first().map(|r| r.len()).unwrap_or(0)
    }

    fn out_dim(&self) -> usize {
        self.weights.len()
    }
}

/// JSON-artifact MLP over the eight screening features.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseClassifier {
    /// Expected input dimension; must equal the feature schema width.
    pub input_dim: usize,

    /// Optional z-score normalization.
    #[serde(default)]
    pub input_mean: Option<Vec<f64>>,
    #[serde(default)]
    pub input_std: Option<Vec<f64>>,

    pub layers: Vec<DenseLayer>,

    /// Optional free-form metadata (versioning, training info, etc).
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl DenseClassifier {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            ServiceError::ModelLoad(format!("{}: {e}", path.as_ref().display()))
        })?;
        let model: Self = serde_json::from_str(&content)
            .map_err(|e| ServiceError::ModelLoad(format!("{}: {e}", path.as_ref().display())))?;
        model.validate().map_err(ServiceError::ModelLoad)?;
        Ok(model)
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.input_dim != FEATURE_NAMES.len() {
            return Err(format!(
                "input_dim {} != feature schema width {}",
                self.input_dim,
                FEATURE_NAMES.len()
            ));
        }
        if self.layers.is_empty() {
            return Err("layers must not be empty".to_string());
        }
        if let (Some(mean), Some(std)) = (&self.input_mean, &self.input_std) {
            if mean.len() != self.input_dim {
                return Err(format!(
                    "input_mean length {} != input_dim {}",
                    mean.len(),
                    self.input_dim
                ));
            }
            if std.len() != self.input_dim {
                return Err(format!(
                    "input_std length {} != input_dim {}",
                    std.len(),
                    self.input_dim
                ));
            }
            if std.iter().any(|v| !v.is_finite() || *v <= 0.0) {
                return Err("input_std must be finite and > 0".to_string());
            }
        } else if self.input_mean.is_some() || self.input_std.is_some() {
            return Err("input_mean and input_std must be provided together".to_string());
        }

        let mut expected_in = self.input_dim;
        for (idx, layer) in self.layers.iter().enumerate() {
            if layer.out_dim() == 0 {
                return Err(format!("layer[{idx}] out_dim must be > 0"));
            }
            if layer.bias.len() != layer.out_dim() {
                return Err(format!(
                    "layer[{idx}] bias len {} != out_dim {}",
                    layer.bias.len(),
                    layer.out_dim()
                ));
            }
            for (r, row) in layer.weights.iter().enumerate() {
                if row.len() != expected_in {
                    return Err(format!(
                        "layer[{idx}] weights row {r} len {} != expected in_dim {expected_in}",
                        row.len()
                    ));
                }
                if row.iter().any(|v| !v.is_finite()) {
                    return Err(format!("layer[{idx}] weights contain non-finite values"));
                }
            }
            if layer.bias.iter().any(|v| !v.is_finite()) {
                return Err(format!("layer[{idx}] bias contain non-finite values"));
            }
            expected_in = layer.out_dim();
        }
        Ok(())
    }

    pub fn output_dim(&self) -> usize {
        self.layers.last().map(|l| l.out_dim()).unwrap_or(0)
    }

    fn forward(&self, input: &[f64]) -> Result<Vec<f64>> {
        if input.len() != self.input_dim {
            return Err(ServiceError::Validation(format!(
                "DenseClassifier input dim mismatch: got {}, expected {}",
                input.len(),
                self.input_dim
            )));
        }

        let mut x: Vec<f64> = input.to_vec();

        if let (Some(mean), Some(std)) = (&self.input_mean, &self.input_std) {
            for i in 0..x.len() {
                let denom = std[i].max(1e-12);
                x[i] = (x[i] - mean[i]) / denom;
            }
        }

        for layer in &self.layers {
            let out_dim = layer.out_dim();
            let in_dim = layer.in_dim();

            let mut y = vec![0.0_f64; out_dim];
            for o in 0..out_dim {
                let mut sum = layer.bias[o];
                // weights[o] is the o-th row (len = in_dim)
                let row = &layer.weights[o];
                debug_assert_eq!(row.len(), in_dim);
                for i in 0..in_dim {
                    sum += row[i] * x[i];
                }
                y[o] = apply_activation(sum, layer.activation);
            }
            x = y;
        }

        Ok(x)
    }
}

impl Classifier for DenseClassifier {
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<i64>> {
        let mut labels = Vec::with_capacity(rows.len());
        for row in rows {
            let output = self.forward(&row.as_inputs())?;
            labels.push(label_from_output(&output)?);
        }
        Ok(labels)
    }
}

fn apply_activation(x: f64, act: Activation) -> f64 {
    match act {
        Activation::Linear => x,
        Activation::Relu => x.max(0.0),
        Activation::Tanh => x.tanh(),
        Activation::Sigmoid => sigmoid(x),
    }
}

fn sigmoid(x: f64) -> f64 {
    // Numerically-stable sigmoid.
    if x >= 0.0 {
        let z = (-x).exp();
        1.0 / (1.0 + z)
    } else {
        let z = x.exp();
        z / (1.0 + z)
    }
}
