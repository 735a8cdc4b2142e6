use std::sync::Arc;

use courier_admin::api;
use courier_admin::config::Config;
use courier_admin::error::AppError;
use courier_admin::state::AppState;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_level.clone()))
        .with_target(false)
        .compact()
        .init();

    let state = AppState::from_config(&config)?;
    {
        let store = state.store()?;
        tracing::info!(
            backend = %config.storage_backend,
            data_dir = %config.data_dir.display(),
            orders = store.orders().len(),
            drivers = store.drivers().len(),
            "record store loaded"
        );
    }

    let app = api::rest::router(Arc::new(state), &config.static_dir).layer(CorsLayer::permissive());

    let bind_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|err| AppError::Internal(format!("failed to bind {bind_addr}: {err}")))?;

    tracing::info!(http_port = config.http_port, "http server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::Internal(format!("server error: {err}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
