use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use core_config::AppInfo;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

/// Liveness body: app identity plus the state of every dependency.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub name: String,
    pub version: String,
    #[serde(flatten)]
    pub checks: BTreeMap<String, String>,
}

/// A boxed future for health checks with a string error
pub type HealthCheckFuture<'a> = Pin<Box<dyn Future<Output = Result<(), String>> + Send + 'a>>;

/// Runs every check concurrently; `true` only if all of them passed.
async fn collect_checks(checks: Vec<(&str, HealthCheckFuture<'_>)>) -> (bool, BTreeMap<String, String>) {
    let names: Vec<_> = checks.iter().map(|(name, _)| *name).collect();
    let futures: Vec<_> = checks.into_iter().map(|(_, check)| check).collect();
    let results = join_all(futures).await;

    let mut states = BTreeMap::new();
    let mut all_healthy = true;

    for (name, result) in names.into_iter().zip(results) {
        let state = match result {
            Ok(()) => "connected",
            Err(e) => {
                tracing::error!(check = name, error = %e, "Health check failed");
                all_healthy = false;
                "disconnected"
            }
        };
        states.insert(name.to_string(), state.to_string());
    }

    (all_healthy, states)
}

fn status_code(all_healthy: bool) -> StatusCode {
    if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// Runs multiple health checks concurrently and returns aggregated results.
///
/// The body is `{"status": "ready" | "not ready", "<name>": "connected" | "disconnected", ...}`;
/// any failure turns the status code into 503.
///
/// # Example
/// ```ignore
/// let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![
///     ("database", Box::pin(async {
///         connections.check_database().await.map_err(|e| e.to_string())
///     })),
///     ("auth", Box::pin(async {
///         connections.check_remote_service().await.map_err(|e| e.to_string())
///     })),
/// ];
/// run_health_checks(checks).await
/// ```
pub async fn run_health_checks(checks: Vec<(&str, HealthCheckFuture<'_>)>) -> Response {
    let (all_healthy, states) = collect_checks(checks).await;

    let mut body: Map<String, Value> = states
        .into_iter()
        .map(|(name, state)| (name, Value::from(state)))
        .collect();
    body.insert(
        "status".to_string(),
        Value::from(if all_healthy { "ready" } else { "not ready" }),
    );

    (status_code(all_healthy), Json(Value::Object(body))).into_response()
}

/// Liveness report: `healthy` with 200 when every check passes, otherwise
/// `unhealthy` with 503. Each check appears by name next to the app identity.
pub async fn health_report(app: &AppInfo, checks: Vec<(&str, HealthCheckFuture<'_>)>) -> Response {
    let (all_healthy, checks) = collect_checks(checks).await;

    let body = HealthResponse {
        status: if all_healthy { "healthy" } else { "unhealthy" }.to_string(),
        name: app.name.to_string(),
        version: app.version.to_string(),
        checks,
    };

    (status_code(all_healthy), Json(body)).into_response()
}
