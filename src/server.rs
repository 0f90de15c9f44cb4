use std::net::{IpAddr, SocketAddr};
use tokio::net::TcpListener;
use tracing::info;

use crate::api::{create_router, AppState};
use crate::config::AppConfig;
use crate::error::{Result, ServiceError};
use crate::ml;

/// Load the model and serve the API until shutdown.
///
/// The model load happens before the listener binds: a broken artifact
/// means the process never starts accepting requests.
pub async fn run(config: AppConfig) -> Result<()> {
    let model = ml::load_classifier(&config.model)?;
    let state = AppState::new(model);
    let app = create_router(state);

    let host: IpAddr = config
        .server
        .host
        .parse()
        .map_err(|e| ServiceError::Validation(format!("invalid server.host: {e}")))?;
    let addr = SocketAddr::from((host, config.server.port));
    info!("prediction service listening on http://{}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
