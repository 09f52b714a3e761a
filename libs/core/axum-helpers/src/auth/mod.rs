//! Bearer authentication.
//!
//! - [`bearer_auth_middleware`] resolves the `Authorization` credential through a
//!   [`CredentialVerifier`] and stores an [`AuthenticatedUser`] on the request
//! - [`extract_claims`] reads a token's claims without verifying it
//! - [`JwtConfig`] holds the optional local JWT settings
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::auth::{CredentialVerifier, bearer_auth_middleware};
//!
//! let verifier: Arc<dyn CredentialVerifier> = Arc::new(connections.remote().clone());
//!
//! let protected = Router::new()
//!     .route("/me", get(handler))
//!     .layer(axum::middleware::from_fn_with_state(verifier, bearer_auth_middleware));
//! ```

pub mod claims;
pub mod config;
pub mod middleware;
pub mod verifier;

pub use claims::{Claims, ClaimsError, extract_claims};
pub use config::{JwtConfig, verify_jwt_config};
pub use middleware::{
    INVALID_TOKEN_MESSAGE, MISSING_HEADER_MESSAGE, bearer_auth_middleware, strip_bearer,
};
pub use verifier::{AuthError, AuthenticatedUser, CredentialVerifier};
