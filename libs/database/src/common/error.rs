/// Error type shared by the connectors and the service bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[cfg(feature = "postgres")]
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sea_orm::DbErr),

    /// Remote auth/storage service transport or protocol failure
    #[error("Remote service error: {0}")]
    Remote(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// A liveness probe failed; retried during bootstrap
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Bootstrap gave up. `causes` holds one entry per attempt, oldest first.
    #[error("Failed to establish service connections after {attempts} attempts: {}", .causes.join("; "))]
    RetriesExhausted { attempts: u32, causes: Vec<String> },
}

impl DatabaseError {
    /// Configuration errors are deterministic; trying again cannot fix them.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, DatabaseError::ConfigError(_))
    }
}

/// Result type alias for database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retries_exhausted_lists_every_cause() {
        let err = DatabaseError::RetriesExhausted {
            attempts: 2,
            causes: vec!["attempt 1: refused".into(), "attempt 2: timeout".into()],
        };
        let message = err.to_string();
        assert!(message.contains("after 2 attempts"));
        assert!(message.contains("attempt 1: refused; attempt 2: timeout"));
    }

    #[test]
    fn test_only_configuration_errors_are_permanent() {
        assert!(!DatabaseError::ConfigError("bad key".into()).is_retryable());
        assert!(DatabaseError::Remote("refused".into()).is_retryable());
        assert!(DatabaseError::HealthCheckFailed("503".into()).is_retryable());
    }
}
