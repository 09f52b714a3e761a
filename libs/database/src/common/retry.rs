use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// How many times to try an operation and how long to wait between tries.
///
/// The defaults match service bootstrap: 3 attempts with a fixed 2s pause.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Total number of attempts, including the first one. Never less than 1.
    pub max_attempts: u32,

    /// Pause between attempts in milliseconds
    pub delay_ms: u64,
}

impl RetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Pause between two attempts.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 2000,
        }
    }
}

#[cfg(feature = "config")]
impl core_config::FromEnv for RetryConfig {
    /// - BOOTSTRAP_MAX_ATTEMPTS: defaults to 3
    /// - BOOTSTRAP_RETRY_DELAY_MS: defaults to 2000
    fn from_env() -> Result<Self, core_config::ConfigError> {
        let defaults = Self::default();
        let max_attempts: u32 =
            core_config::env_parse_or("BOOTSTRAP_MAX_ATTEMPTS", defaults.max_attempts)?;
        if max_attempts == 0 {
            return Err(core_config::ConfigError::parse(
                "BOOTSTRAP_MAX_ATTEMPTS",
                "must be at least 1",
            ));
        }
        let delay_ms = core_config::env_parse_or("BOOTSTRAP_RETRY_DELAY_MS", defaults.delay_ms)?;

        Ok(Self::new().with_max_attempts(max_attempts).with_delay(delay_ms))
    }
}

/// Runs `operation` until it succeeds, `config.max_attempts` is reached, or
/// it fails with an error for which `retryable` returns `false`.
///
/// The closure receives the 1-based attempt number. On failure every
/// attempt's error is returned, oldest first, so a permanent error is the
/// last entry. There is no pause after the final attempt.
///
/// ```ignore
/// let config = RetryConfig::new().with_max_attempts(5);
/// let db = retry_with_backoff(|_| postgres::connect(&url), &config, |_| true).await?;
/// ```
pub async fn retry_with_backoff<F, Fut, T, E, P>(
    mut operation: F,
    config: &RetryConfig,
    retryable: P,
) -> Result<T, Vec<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let max_attempts = config.max_attempts.max(1);
    let mut errors = Vec::with_capacity(max_attempts as usize);

    for attempt in 1..=max_attempts {
        match operation(attempt).await {
            Ok(result) => {
                if attempt > 1 {
                    debug!(attempt, "Operation succeeded after retrying");
                }
                return Ok(result);
            }
            Err(e) if !retryable(&e) => {
                warn!(attempt, max_attempts, error = %e, "Attempt failed with a permanent error");
                errors.push(e);
                break;
            }
            Err(e) => {
                if attempt < max_attempts {
                    let delay = config.delay();
                    warn!(
                        attempt,
                        max_attempts,
                        retry_in_ms = delay.as_millis() as u64,
                        error = %e,
                        "Attempt failed, retrying"
                    );
                    errors.push(e);
                    tokio::time::sleep(delay).await;
                } else {
                    warn!(attempt, max_attempts, error = %e, "Final attempt failed");
                    errors.push(e);
                }
            }
        }
    }

    Err(errors)
}
