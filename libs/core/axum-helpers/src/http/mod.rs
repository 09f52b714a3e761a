//! HTTP middleware module.
//!
//! This module provides HTTP-level middleware for:
//! - Request logging with `X-Request-ID` correlation
//! - CORS headers and preflight handling
//! - Security headers
//! - Chaining the above with bearer auth in a fixed order
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::http::{ChainConfig, CorsConfig, protect};
//!
//! let chain = ChainConfig::new(CorsConfig::from_env()?.policy()?, verifier);
//! let api = protect(Router::new().route("/me", get(me)), &chain);
//! ```

pub mod chain;
pub mod cors;
pub mod logging;
pub mod security;

// Re-export commonly used types and functions
pub use chain::{ChainConfig, protect, public};
pub use cors::{CorsConfig, CorsPolicy, DEFAULT_ALLOWED_ORIGIN, cors_middleware};
pub use logging::{
    BYPASS_PATHS, REQUEST_ID_HEADER, RequestId, RequestRecord, request_logging_middleware,
};
pub use security::security_headers;
