//! Server infrastructure module.
//!
//! This module provides:
//! - Router assembly (protected API, public routes, OpenAPI document)
//! - Health and readiness helpers
//! - Graceful shutdown with bounded cleanup
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router};
//!
//! let public_routes = Router::new()
//!     .route("/health", get(health))
//!     .route("/ready", get(ready))
//!     .with_state(state);
//! let router = create_router::<ApiDoc>(api_routes, public_routes, &chain, &server_config);
//!
//! create_production_app(router, &server_config, Duration::from_secs(30), cleanup).await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

// Re-export commonly used types and functions
pub use app::{OPENAPI_PATH, create_production_app, create_router, serve};
pub use health::{HealthCheckFuture, HealthResponse, health_report, run_health_checks};
pub use shutdown::{ShutdownCoordinator, shutdown_signal};
