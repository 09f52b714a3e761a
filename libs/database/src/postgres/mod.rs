//! PostgreSQL pool: configuration, connection and liveness probing.

mod config;
mod connector;
mod health;

pub use config::PostgresConfig;
pub use connector::{close, connect};
pub use health::check_health;

pub use sea_orm::{DatabaseConnection, DbErr};
