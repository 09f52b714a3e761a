use crate::state::AppState;
use axum::{Router, routing::get};
use database::Bootstrap;

pub mod health;
pub mod me;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix and the auth chain are added by `create_router`.
pub fn routes() -> Router {
    Router::new().merge(me::router())
}

/// Creates a router with the /health and /ready endpoints, both of which
/// probe the database and the auth service on every call.
///
/// State is applied here so it merges with the stateless public routes.
pub fn health_router<B: Bootstrap>(state: AppState<B>) -> Router {
    Router::new()
        .route("/health", get(health::health_handler::<B>))
        .route("/ready", get(health::ready_handler::<B>))
        .with_state(state)
}
