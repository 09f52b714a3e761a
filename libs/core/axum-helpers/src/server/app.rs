use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::not_found;
use crate::http::{ChainConfig, protect, public, security_headers};
use axum::{Json, Router, extract::DefaultBodyLimit, middleware, routing::get};
use core_config::server::ServerConfig;
use std::future::Future;
use std::io;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tracing::info;
use utoipa::OpenApi;

pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// Assembles the application router.
///
/// - `api` is nested under `/api` behind logging, CORS and bearer auth
/// - `public_routes` (health, readiness) and the OpenAPI document get logging
///   and CORS only
/// - unknown paths get a JSON 404
/// - routed requests get the request timeout from `server_config` inside the
///   chain, so a 408 is logged and carries CORS headers
/// - everything gets security headers, compression and the body size limit
///
/// # Example
/// ```ignore
/// #[derive(OpenApi)]
/// #[openapi(paths(me))]
/// struct ApiDoc;
///
/// let router = create_router::<ApiDoc>(api_routes, health_routes, &chain, &server_config);
/// ```
pub fn create_router<T>(
    api: Router,
    public_routes: Router,
    chain: &ChainConfig,
    server_config: &ServerConfig,
) -> Router
where
    T: OpenApi + 'static,
{
    let chain = chain
        .clone()
        .with_request_timeout(server_config.request_timeout);
    let public_routes =
        public_routes.route(OPENAPI_PATH, get(|| async { Json(T::openapi()) }));

    Router::new()
        .nest("/api", protect(api, &chain))
        .merge(public(public_routes, &chain))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(server_config.max_upload_size))
        .layer(middleware::from_fn(security_headers))
        .layer(CompressionLayer::new())
}

/// Production-ready server with coordinated shutdown and cleanup.
///
/// Binds `server_config.address()` and serves until SIGINT/SIGTERM, then runs
/// `cleanup` for at most `shutdown_timeout`.
///
/// # Example
/// ```ignore
/// let cleanup = async move { connections.close().await };
///
/// create_production_app(router, &config, Duration::from_secs(30), cleanup).await?;
/// ```
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(server_config.address()).await?;
    serve(listener, router, ShutdownCoordinator::default(), shutdown_timeout, cleanup).await
}

/// Serves on an already bound listener until `coordinator` fires.
pub async fn serve<F>(
    listener: TcpListener,
    router: Router,
    coordinator: ShutdownCoordinator,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!("Server starting on {}", listener.local_addr()?);

    let shutdown_handle = coordinator.clone();
    let cleanup_handle = tokio::spawn(async move {
        shutdown_handle.wait_for_signal().await;

        info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
        match tokio::time::timeout(shutdown_timeout, cleanup).await {
            Ok(()) => info!("Cleanup completed successfully"),
            Err(_) => tracing::warn!(
                "Cleanup exceeded timeout of {:?}, forcing shutdown",
                shutdown_timeout
            ),
        }
    });

    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move { coordinator.wait_for_signal().await })
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        });

    cleanup_handle.await.ok();

    serve_result
}
