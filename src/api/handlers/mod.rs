mod predict;
mod system;

pub use predict::diabetes_prediction;
pub use system::{liveness_handler, readiness_handler};
