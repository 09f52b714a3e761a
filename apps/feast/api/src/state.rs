//! Shared application state.
//!
//! Built once after a successful bootstrap and cloned into handlers; clones
//! share the config and both connection handles.

use crate::config::Config;
use database::Bootstrap;
use database::bootstrap::{Connections, ServiceBootstrap};
use std::sync::Arc;

pub struct AppState<B: Bootstrap = ServiceBootstrap> {
    pub config: Arc<Config>,
    pub connections: Connections<B>,
}

impl<B: Bootstrap> AppState<B> {
    pub fn new(config: Config, connections: Connections<B>) -> Self {
        Self {
            config: Arc::new(config),
            connections,
        }
    }
}

impl<B: Bootstrap> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            connections: self.connections.clone(),
        }
    }
}
