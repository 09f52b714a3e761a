//! # Axum Helpers
//!
//! Request admission for Axum services: the middleware every protected route
//! runs through, plus server assembly around it.
//!
//! ## Modules
//!
//! - **[`auth`]**: bearer authentication against a [`CredentialVerifier`], unverified claim reading
//! - **[`http`]**: request logging, CORS, security headers and the chain that orders them
//! - **[`server`]**: router assembly, health/readiness, graceful shutdown
//! - **[`errors`]**: `{status, message, code}` error responses
//! - **[`response`]**: `{status, message, data}` success envelope
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum_helpers::{ChainConfig, CorsConfig, create_production_app, create_router};
//! use core_config::{FromEnv, server::ServerConfig};
//!
//! let chain = ChainConfig::new(CorsConfig::from_env()?.policy()?, verifier);
//! let router = create_router::<ApiDoc>(api_routes, health_routes, &chain, &server);
//! create_production_app(router, &server, Duration::from_secs(30), async {}).await?;
//! ```

pub mod auth;
pub mod errors;
pub mod http;
pub mod response;
pub mod server;

// Re-export auth types
pub use auth::{
    AuthError, AuthenticatedUser, Claims, ClaimsError, CredentialVerifier, JwtConfig,
    bearer_auth_middleware, extract_claims, verify_jwt_config,
};

// Re-export server types
pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_report, run_health_checks, shutdown_signal,
};

// Re-export HTTP middleware
pub use http::{
    ChainConfig, CorsConfig, CorsPolicy, RequestId, cors_middleware, protect, public,
    request_logging_middleware, security_headers,
};

// Re-export error and response types
pub use errors::{AppError, ErrorResponse, error_response};
pub use response::ApiResponse;
