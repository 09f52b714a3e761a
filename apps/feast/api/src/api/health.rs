//! Liveness and readiness handlers, both with live checks against the
//! database and the auth service.

use crate::state::AppState;
use axum::{extract::State, response::Response};
use axum_helpers::server::{HealthCheckFuture, health_report, run_health_checks};
use database::Bootstrap;
use database::bootstrap::Connections;

fn dependency_checks<B: Bootstrap>(connections: &Connections<B>) -> Vec<(&'static str, HealthCheckFuture<'_>)> {
    vec![
        (
            "database",
            Box::pin(async {
                connections
                    .check_database()
                    .await
                    .map_err(|e| format!("Database ping failed: {}", e))
            }),
        ),
        (
            "auth",
            Box::pin(async {
                connections
                    .check_remote_service()
                    .await
                    .map_err(|e| format!("Auth service check failed: {}", e))
            }),
        ),
    ]
}

/// `{"status": "healthy", "name", "version", "database", "auth"}`; 503 with
/// `"unhealthy"` when either probe fails.
pub async fn health_handler<B: Bootstrap>(State(state): State<AppState<B>>) -> Response {
    health_report(&state.config.app, dependency_checks(&state.connections)).await
}

/// 200 `{"status": "ready", "database": "connected", "auth": "connected"}`,
/// otherwise 503 with the failing leg marked `"disconnected"`.
pub async fn ready_handler<B: Bootstrap>(State(state): State<AppState<B>>) -> Response {
    run_health_checks(dependency_checks(&state.connections)).await
}
