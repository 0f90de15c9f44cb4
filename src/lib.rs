pub mod api;
pub mod config;
pub mod error;
pub mod features;
pub mod logging;
pub mod ml;
pub mod server;

pub use config::AppConfig;
pub use error::{PredictError, Result, ServiceError};
pub use features::{FeatureRow, FEATURE_NAMES};
pub use ml::Classifier;
