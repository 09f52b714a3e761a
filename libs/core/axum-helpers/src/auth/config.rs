use core_config::{ConfigError, FromEnv, env_parse_or};
use std::fmt;
use tracing::{info, warn};

/// JWT settings.
///
/// Tokens are verified by the auth provider, so the secret is optional here.
///
/// Loaded from environment variables:
/// - `JWT_SECRET` (optional, at least 32 characters when set)
/// - `JWT_EXPIRATION_HOURS` (default: 24)
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: Option<String>,
    pub expiration_hours: u64,
}

impl JwtConfig {
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret,
            expiration_hours: 24,
        }
    }

    pub fn has_secret(&self) -> bool {
        self.secret.is_some()
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self::new(None)
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

impl FromEnv for JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty());

        if let Some(secret) = &secret {
            if secret.len() < 32 {
                return Err(ConfigError::parse(
                    "JWT_SECRET",
                    format!(
                        "must be at least 32 characters (got {}). Generate one with: openssl rand -base64 32",
                        secret.len()
                    ),
                ));
            }
        }

        let expiration_hours = env_parse_or("JWT_EXPIRATION_HOURS", 24u64)?;
        if expiration_hours == 0 {
            return Err(ConfigError::parse("JWT_EXPIRATION_HOURS", "must be greater than 0"));
        }

        Ok(Self {
            secret,
            expiration_hours,
        })
    }
}

/// Logs whether JWT settings are present. Never logs the secret.
pub fn verify_jwt_config(config: &JwtConfig) {
    match &config.secret {
        Some(secret) => info!(
            secret_length = secret.len(),
            expiration_hours = config.expiration_hours,
            "JWT configuration loaded"
        ),
        None => warn!("JWT_SECRET is not set; tokens are verified by the auth provider only"),
    }
}
