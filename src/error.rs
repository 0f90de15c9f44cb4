use thiserror::Error;

/// Main error type for the prediction service
#[derive(Error, Debug)]
pub enum ServiceError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Model lifecycle errors
    #[error("Model load failed: {0}")]
    ModelLoad(String),

    // Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for ServiceError
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Per-request error taxonomy for the prediction endpoint.
///
/// These never escalate past the request that produced them: each maps to
/// an HTTP status and a structured error payload for the caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictError {
    #[error("invalid request: {0}")]
    InputFormat(String),

    #[error("record {record}: field {field:?} cannot be cast from {value}")]
    TypeCoercion {
        record: usize,
        field: &'static str,
        value: String,
    },

    #[error("model inference failed: {0}")]
    ModelInference(String),
}

impl PredictError {
    /// Stable machine-readable kind, used in error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InputFormat(_) => "input_format",
            Self::TypeCoercion { .. } => "type_coercion",
            Self::ModelInference(_) => "model_inference",
        }
    }
}
