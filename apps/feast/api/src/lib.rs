//! Feast Friends API: admission chain and service readiness wired together.

use axum::Router;
use axum_helpers::{ChainConfig, CredentialVerifier, create_router};
use core_config::ConfigError;
use database::Bootstrap;
use std::sync::Arc;

pub mod api;
pub mod config;
pub mod openapi;
pub mod state;

pub use config::Config;
pub use state::AppState;

/// Builds the complete application router for a bootstrapped state.
///
/// The remote client held in the connections doubles as the credential
/// verifier for the auth middleware.
pub fn app<B>(state: &AppState<B>) -> Result<Router, ConfigError>
where
    B: Bootstrap,
    B::Remote: CredentialVerifier,
{
    let verifier: Arc<dyn CredentialVerifier> = Arc::new(state.connections.remote().clone());
    let chain = ChainConfig::new(state.config.cors.policy()?, verifier);

    let public_routes = api::health_router(state.clone());

    Ok(create_router::<openapi::ApiDoc>(
        api::routes(),
        public_routes,
        &chain,
        &state.config.server,
    ))
}
