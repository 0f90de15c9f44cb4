//! Fixed eight-feature input schema for the diabetes classifier.
//!
//! Raw records arrive as loose JSON objects. This module projects each record
//! onto the eight named features (fixed order, extras discarded) and applies
//! strict numeric casts, so the rest of the service only ever sees
//! strongly-typed rows.

use serde_json::Value;

use crate::error::PredictError;

/// Feature names in model input order.
pub const FEATURE_NAMES: [&str; 8] = [
    "Pregnancies",
    "Glucose",
    "BloodPressure",
    "SkinThickness",
    "Insulin",
    "BMI",
    "DiabetesPedigreeFunction",
    "Age",
];

/// One validated subject record, ready for inference.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub pregnancies: i64,
    pub glucose: i64,
    pub blood_pressure: i64,
    pub skin_thickness: i64,
    pub insulin: i64,
    pub bmi: f64,
    pub diabetes_pedigree_function: f64,
    pub age: i64,
}

impl FeatureRow {
    /// Project a raw JSON record onto the fixed schema.
    ///
    /// `index` is the record's position in the request batch, used in error
    /// messages. Fields beyond the eight required ones are ignored.
    pub fn from_record(
        index: usize,
        record: &serde_json::Map<String, Value>,
    ) -> std::result::Result<Self, PredictError> {
        Ok(Self {
            pregnancies: require_int(index, record, "Pregnancies")?,
            glucose: require_int(index, record, "Glucose")?,
            blood_pressure: require_int(index, record, "BloodPressure")?,
            skin_thickness: require_int(index, record, "SkinThickness")?,
            insulin: require_int(index, record, "Insulin")?,
            bmi: require_float(index, record, "BMI")?,
            diabetes_pedigree_function: require_float(index, record, "DiabetesPedigreeFunction")?,
            age: require_int(index, record, "Age")?,
        })
    }

    /// Flatten into model input order (matches [`FEATURE_NAMES`]).
    pub fn as_inputs(&self) -> [f64; 8] {
        [
            self.pregnancies as f64,
            self.glucose as f64,
            self.blood_pressure as f64,
            self.skin_thickness as f64,
            self.insulin as f64,
            self.bmi,
            self.diabetes_pedigree_function,
            self.age as f64,
        ]
    }
}

fn require_value<'a>(
    index: usize,
    record: &'a serde_json::Map<String, Value>,
    field: &'static str,
) -> std::result::Result<&'a Value, PredictError> {
    record.get(field).ok_or_else(|| {
        PredictError::InputFormat(format!("record {index} is missing required field {field:?}"))
    })
}

fn require_int(
    index: usize,
    record: &serde_json::Map<String, Value>,
    field: &'static str,
) -> std::result::Result<i64, PredictError> {
    let value = require_value(index, record, field)?;
    cast_int(value).ok_or_else(|| PredictError::TypeCoercion {
        record: index,
        field,
        value: value.to_string(),
    })
}

fn require_float(
    index: usize,
    record: &serde_json::Map<String, Value>,
    field: &'static str,
) -> std::result::Result<f64, PredictError> {
    let value = require_value(index, record, field)?;
    cast_float(value).ok_or_else(|| PredictError::TypeCoercion {
        record: index,
        field,
        value: value.to_string(),
    })
}

/// Strict cast to i64: whole JSON numbers, or strings holding one.
///
/// Fractional values are rejected rather than truncated, so `7.5` is not a
/// valid `Age` but `"7"` and `7.0` both are.
fn cast_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(i);
            }
            // u64 out of i64 range, or fractional f64
            whole_f64_to_i64(n.as_f64()?)
        }
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                return Some(i);
            }
            whole_f64_to_i64(s.parse::<f64>().ok()?)
        }
        _ => None,
    }
}

/// Strict cast to f64: any finite JSON number, or a string holding one.
fn cast_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

fn whole_f64_to_i64(v: f64) -> Option<i64> {
    if !v.is_finite() || v.fract() != 0.0 {
        return None;
    }
    // i64::MAX is not exactly representable as f64; stay inside the safe band.
    if v < -9_007_199_254_740_992.0 || v > 9_007_199_254_740_992.0 {
        return None;
    }
    Some(v as i64)
}
