use tracing::error;

use diapred::{config::AppConfig, logging, server};

#[tokio::main]
async fn main() {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    logging::init_logging(&config.logging);

    if let Err(errors) = config.validate() {
        for err in &errors {
            error!("invalid configuration: {err}");
        }
        std::process::exit(1);
    }

    if let Err(e) = server::run(config).await {
        error!("fatal: {e}");
        std::process::exit(1);
    }
}
