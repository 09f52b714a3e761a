use sea_orm::{Database, DatabaseConnection};
use tracing::{info, instrument};

use super::PostgresConfig;
use crate::common::{DatabaseError, DatabaseResult};

/// Opens a connection pool.
///
/// The dial is bounded twice: by the pool's own `connect_timeout` and by an
/// outer timer of the same length, since the first connection of a pool can
/// otherwise outlive it while DNS or TLS stalls.
///
/// ```ignore
/// let db = database::postgres::connect(&PostgresConfig::from_env()?).await?;
/// ```
#[instrument(skip_all, fields(db = %config.redacted_url()))]
pub async fn connect(config: &PostgresConfig) -> DatabaseResult<DatabaseConnection> {
    let options = config.to_connect_options();

    let db = tokio::time::timeout(config.connect_timeout, Database::connect(options))
        .await
        .map_err(|_| {
            DatabaseError::ConnectionFailed(format!(
                "timed out after {}ms connecting to {}",
                config.connect_timeout.as_millis(),
                config.redacted_url()
            ))
        })??;

    info!("Opened PostgreSQL connection pool");
    Ok(db)
}

/// Closes every connection in the pool.
pub async fn close(db: DatabaseConnection) -> DatabaseResult<()> {
    db.close().await?;
    info!("PostgreSQL connection pool closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_connect_to_unreachable_host_fails_within_timeout() {
        // TEST-NET-1, never routed
        let config = PostgresConfig::new("postgresql://user:pw@192.0.2.1:5432/feast")
            .with_connect_timeout(Duration::from_millis(300));

        let started = std::time::Instant::now();
        let result = connect(&config).await;

        assert!(result.is_err());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_connect_with_malformed_url_fails() {
        let config = PostgresConfig::new("not a url").with_connect_timeout(Duration::from_secs(1));
        assert!(connect(&config).await.is_err());
    }
}
