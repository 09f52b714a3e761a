//! Connectors for the services the API depends on at startup.
//!
//! # Features
//!
//! - `postgres` (default) - PostgreSQL pool via SeaORM
//! - `supabase` (default) - Supabase auth client via reqwest
//! - `config` - `core_config::FromEnv` implementations
//!
//! ```ignore
//! use database::bootstrap::{ConnectionManager, ServiceBootstrap};
//!
//! let backend = ServiceBootstrap::new(supabase_config, postgres_config);
//! let connections = ConnectionManager::new(backend, RetryConfig::default()).connect().await?;
//! ```

pub mod bootstrap;
pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(feature = "supabase")]
pub mod supabase;

pub use bootstrap::{Bootstrap, ConnectionManager, Connections};
pub use common::{DatabaseError, DatabaseResult, RetryConfig};
