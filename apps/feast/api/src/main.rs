use axum_helpers::{create_production_app, verify_jwt_config};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::ConnectionManager;
use database::bootstrap::ServiceBootstrap;
use feast_api::{AppState, Config};
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let config = Config::from_env()?;

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_tracing(&config.environment, &config.logging);

    info!(
        environment = config.environment.as_str(),
        version = config.app.version,
        "Starting feast API"
    );
    verify_jwt_config(&config.jwt);

    let backend = ServiceBootstrap::new(config.supabase.clone(), config.database.clone());
    let connections = ConnectionManager::new(backend, config.bootstrap.clone())
        .connect()
        .await
        .map_err(|e| eyre::eyre!("Service bootstrap failed: {}", e))?;

    let state = AppState::new(config, connections);
    let router = feast_api::app(&state)?;

    info!("Starting feast API with production-ready shutdown (30s timeout)");

    let server_config = state.config.server.clone();
    create_production_app(router, &server_config, Duration::from_secs(30), async move {
        info!("Shutting down: closing database connections");
        match state.connections.close().await {
            Ok(()) => info!("PostgreSQL connection closed successfully"),
            Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Feast API shutdown complete");
    Ok(())
}
