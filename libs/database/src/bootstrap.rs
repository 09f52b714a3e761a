//! Startup connectivity for the remote auth service and the database pool.
//!
//! [`ConnectionManager::connect`] runs bounded attempts. Each attempt builds
//! the remote client, probes it, opens the pool and pings it. Only an
//! attempt in which both probes pass yields [`Connections`]; nothing from a
//! failed attempt is carried into the next one. A remote client that cannot
//! be built is a configuration error and ends bootstrap at once.
//!
//! ```ignore
//! let backend = ServiceBootstrap::new(config.supabase.clone(), config.database.clone());
//! let connections = ConnectionManager::new(backend, config.bootstrap.clone())
//!     .connect()
//!     .await?;
//! connections.check_database().await?;
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, instrument, warn};

use crate::common::{retry_with_backoff, DatabaseError, DatabaseResult, RetryConfig};

/// The four steps of a bootstrap attempt, for one pair of backends.
#[async_trait]
pub trait Bootstrap: Send + Sync + 'static {
    type Remote: Clone + Send + Sync + 'static;
    type Pool: Clone + Send + Sync + 'static;

    async fn connect_remote(&self) -> DatabaseResult<Self::Remote>;

    async fn probe_remote(&self, remote: &Self::Remote) -> DatabaseResult<()>;

    async fn open_pool(&self) -> DatabaseResult<Self::Pool>;

    async fn probe_pool(&self, pool: &Self::Pool) -> DatabaseResult<()>;

    async fn close_pool(&self, _pool: Self::Pool) -> DatabaseResult<()> {
        Ok(())
    }
}

/// Verified handles to both backends.
pub struct Connections<B: Bootstrap> {
    backend: Arc<B>,
    remote: B::Remote,
    pool: B::Pool,
}

impl<B: Bootstrap> Clone for Connections<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            remote: self.remote.clone(),
            pool: self.pool.clone(),
        }
    }
}

impl<B: Bootstrap> Connections<B> {
    pub fn remote(&self) -> &B::Remote {
        &self.remote
    }

    pub fn pool(&self) -> &B::Pool {
        &self.pool
    }

    /// Live round-trip to the remote service.
    pub async fn check_remote_service(&self) -> DatabaseResult<()> {
        self.backend.probe_remote(&self.remote).await
    }

    /// Live round-trip to the database.
    pub async fn check_database(&self) -> DatabaseResult<()> {
        self.backend.probe_pool(&self.pool).await
    }

    pub async fn close(self) -> DatabaseResult<()> {
        self.backend.close_pool(self.pool).await
    }
}

pub struct ConnectionManager<B: Bootstrap> {
    backend: Arc<B>,
    retry: RetryConfig,
}

impl<B: Bootstrap> ConnectionManager<B> {
    pub fn new(backend: B, retry: RetryConfig) -> Self {
        Self {
            backend: Arc::new(backend),
            retry,
        }
    }

    /// Establishes both connections or returns
    /// [`DatabaseError::RetriesExhausted`] carrying every attempt's failure.
    ///
    /// A [`DatabaseError::ConfigError`] is returned as is, without retrying.
    #[instrument(skip(self), fields(max_attempts = self.retry.max_attempts))]
    pub async fn connect(&self) -> DatabaseResult<Connections<B>> {
        let outcome = retry_with_backoff(
            |attempt| self.attempt(attempt),
            &self.retry,
            DatabaseError::is_retryable,
        )
        .await;

        match outcome {
            Ok(connections) => {
                info!("Connected to remote service and database");
                Ok(connections)
            }
            Err(mut errors) if errors.last().is_some_and(|e| !e.is_retryable()) => {
                let err = errors.pop().unwrap_or_else(|| {
                    DatabaseError::ConfigError("remote client could not be built".to_string())
                });
                error!(error = %err, "Service connections are misconfigured, not retrying");
                Err(err)
            }
            Err(errors) => {
                let causes: Vec<String> = errors
                    .iter()
                    .enumerate()
                    .map(|(i, e)| format!("attempt {}: {}", i + 1, e))
                    .collect();
                let err = DatabaseError::RetriesExhausted {
                    attempts: causes.len() as u32,
                    causes,
                };
                error!(error = %err, "Giving up on service connections");
                Err(err)
            }
        }
    }

    async fn attempt(&self, attempt: u32) -> DatabaseResult<Connections<B>> {
        info!(attempt, max_attempts = self.retry.max_attempts, "Connecting to services");

        let remote = match self.backend.connect_remote().await {
            Ok(remote) => remote,
            Err(e) => {
                error!(attempt, error = %e, "Remote client configuration error");
                return Err(e);
            }
        };
        if let Err(e) = self.backend.probe_remote(&remote).await {
            warn!(attempt, error = %e, "Remote service probe failed");
            return Err(e);
        }

        let pool = self.backend.open_pool().await?;
        if let Err(e) = self.backend.probe_pool(&pool).await {
            warn!(attempt, error = %e, "Database probe failed");
            if let Err(close_err) = self.backend.close_pool(pool).await {
                warn!(error = %close_err, "Failed to close pool after failed probe");
            }
            return Err(e);
        }

        Ok(Connections {
            backend: Arc::clone(&self.backend),
            remote,
            pool,
        })
    }
}

#[cfg(all(feature = "postgres", feature = "supabase"))]
pub use service::{ServiceBootstrap, ServiceConnections};

#[cfg(all(feature = "postgres", feature = "supabase"))]
mod service {
    use super::*;
    use crate::postgres::{self, DatabaseConnection, PostgresConfig};
    use crate::supabase::{SupabaseClient, SupabaseConfig};

    /// Supabase auth service plus a PostgreSQL pool.
    #[derive(Debug, Clone)]
    pub struct ServiceBootstrap {
        supabase: SupabaseConfig,
        postgres: PostgresConfig,
    }

    impl ServiceBootstrap {
        pub fn new(supabase: SupabaseConfig, postgres: PostgresConfig) -> Self {
            Self { supabase, postgres }
        }
    }

    pub type ServiceConnections = Connections<ServiceBootstrap>;

    #[async_trait]
    impl Bootstrap for ServiceBootstrap {
        type Remote = SupabaseClient;
        type Pool = DatabaseConnection;

        async fn connect_remote(&self) -> DatabaseResult<SupabaseClient> {
            SupabaseClient::new(&self.supabase)
        }

        async fn probe_remote(&self, remote: &SupabaseClient) -> DatabaseResult<()> {
            remote.check_health().await
        }

        async fn open_pool(&self) -> DatabaseResult<DatabaseConnection> {
            postgres::connect(&self.postgres).await
        }

        async fn probe_pool(&self, pool: &DatabaseConnection) -> DatabaseResult<()> {
            postgres::check_health(pool).await
        }

        async fn close_pool(&self, pool: DatabaseConnection) -> DatabaseResult<()> {
            postgres::close(pool).await
        }
    }
}
