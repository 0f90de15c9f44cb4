use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (default: all interfaces)
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Path to the pre-trained model artifact. The training pipeline that
    /// produces it is an external concern; this may equally point at a file
    /// synced down from a model registry.
    #[serde(default = "default_model_path")]
    pub path: String,
}

fn default_model_path() -> String {
    "model_diabetes_prediction.json".to_string()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("model.path", "model_diabetes_prediction.json")?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("DIAPRED_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (DIAPRED_SERVER__PORT, etc.)
            .add_source(
                Environment::with_prefix("DIAPRED")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.model.path.trim().is_empty() {
            errors.push("model.path must not be empty".to_string());
        }

        if self.server.port == 0 {
            errors.push("server.port must be non-zero".to_string());
        }

        if self.server.host.trim().is_empty() {
            errors.push("server.host must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Tests below read process environment; serialize them so overrides set
    // in one test never leak into another running concurrently.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn defaults_match_service_contract() {
        let config = AppConfig {
            server: ServerConfig::default(),
            model: ModelConfig::default(),
            logging: LoggingConfig::default(),
        };
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.model.path, "model_diabetes_prediction.json");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_model_path_fails_validation() {
        let config = AppConfig {
            server: ServerConfig::default(),
            model: ModelConfig {
                path: "  ".to_string(),
            },
            logging: LoggingConfig::default(),
        };
        let errors = config.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("model.path")));
    }

    #[test]
    fn load_from_missing_dir_falls_back_to_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();

        let config = AppConfig::load_from("/nonexistent/config/dir").unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.model.path, "model_diabetes_prediction.json");
    }

    #[test]
    fn environment_variables_override_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();

        std::env::set_var("DIAPRED_SERVER__PORT", "6001");
        std::env::set_var("DIAPRED_MODEL__PATH", "/opt/models/diabetes.json");

        let config = AppConfig::load_from("/nonexistent/config/dir");

        std::env::remove_var("DIAPRED_SERVER__PORT");
        std::env::remove_var("DIAPRED_MODEL__PATH");

        let config = config.unwrap();
        assert_eq!(config.server.port, 6001);
        assert_eq!(config.model.path, "/opt/models/diabetes.json");
        // Untouched sections keep their defaults.
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.level, "info");
    }
}
