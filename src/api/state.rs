use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::ml::Classifier;

/// Shared application state for API handlers
///
/// The model handle is immutable after startup, so concurrent requests may
/// run inference without coordination.
#[derive(Clone)]
pub struct AppState {
    /// Loaded classification model
    pub model: Arc<dyn Classifier>,

    /// Application start time
    pub start_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(model: Arc<dyn Classifier>) -> Self {
        Self {
            model,
            start_time: Utc::now(),
        }
    }

    /// Get system uptime in seconds
    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.start_time).num_seconds()
    }
}
