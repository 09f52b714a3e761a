use crate::{env_or_default, env_parse_or, ConfigError, FromEnv};
use std::net::Ipv4Addr;
use std::time::Duration;

/// Listener settings for the HTTP API.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on a single request, including remote token checks.
    pub request_timeout: Duration,
    pub max_upload_size: usize,
}

impl ServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        Self {
            host,
            port,
            ..Self::default()
        }
    }

    /// Get the server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl FromEnv for ServerConfig {
    /// - HOST: defaults to 0.0.0.0
    /// - PORT (or SERVER_PORT): defaults to 8080
    /// - REQUEST_TIMEOUT_SECS: defaults to 30
    /// - MAX_UPLOAD_SIZE_BYTES: defaults to 10 MiB
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let host = env_or_default("HOST", &defaults.host);

        let port_key = if std::env::var("PORT").is_ok() {
            "PORT"
        } else {
            "SERVER_PORT"
        };
        let port = env_parse_or(port_key, defaults.port)?;

        let request_timeout = Duration::from_secs(env_parse_or(
            "REQUEST_TIMEOUT_SECS",
            defaults.request_timeout.as_secs(),
        )?);
        let max_upload_size = env_parse_or("MAX_UPLOAD_SIZE_BYTES", defaults.max_upload_size)?;

        Ok(Self {
            host,
            port,
            request_timeout,
            max_upload_size,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::UNSPECIFIED.to_string(),
            port: 8080,
            request_timeout: Duration::from_secs(30),
            max_upload_size: 10 * 1024 * 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: [&str; 5] = [
        "HOST",
        "PORT",
        "SERVER_PORT",
        "REQUEST_TIMEOUT_SECS",
        "MAX_UPLOAD_SIZE_BYTES",
    ];

    #[test]
    fn test_server_config_from_env_with_defaults() {
        temp_env::with_vars_unset(KEYS, || {
            let config = ServerConfig::from_env().unwrap();
            assert_eq!(config.address(), "0.0.0.0:8080");
            assert_eq!(config.request_timeout, Duration::from_secs(30));
            assert_eq!(config.max_upload_size, 10 * 1024 * 1024);
        });
    }

    #[test]
    fn test_server_config_from_env_with_custom_values() {
        temp_env::with_vars(
            [
                ("HOST", Some("127.0.0.1")),
                ("PORT", Some("3000")),
                ("REQUEST_TIMEOUT_SECS", Some("5")),
                ("MAX_UPLOAD_SIZE_BYTES", Some("1024")),
            ],
            || {
                let config = ServerConfig::from_env().unwrap();
                assert_eq!(config.address(), "127.0.0.1:3000");
                assert_eq!(config.request_timeout, Duration::from_secs(5));
                assert_eq!(config.max_upload_size, 1024);
            },
        );
    }

    #[test]
    fn test_server_port_fallback() {
        temp_env::with_vars(
            [("PORT", None::<&str>), ("SERVER_PORT", Some("9000"))],
            || {
                assert_eq!(ServerConfig::from_env().unwrap().port, 9000);
            },
        );
    }

    #[test]
    fn test_server_config_from_env_invalid_port() {
        temp_env::with_var("PORT", Some("not_a_number"), || {
            let err = ServerConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("PORT"));
        });
    }

    #[test]
    fn test_server_config_from_env_port_out_of_range() {
        temp_env::with_var("PORT", Some("99999"), || {
            assert!(ServerConfig::from_env().is_err());
        });
    }

    #[test]
    fn test_server_config_new_keeps_limits() {
        let config = ServerConfig::new("localhost".to_string(), 5000);
        assert_eq!(config.address(), "localhost:5000");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }
}
