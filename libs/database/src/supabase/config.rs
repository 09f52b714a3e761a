use std::fmt;
use std::time::Duration;

#[cfg(feature = "config")]
use core_config::{env_parse_or, env_required, ConfigError, FromEnv};

/// Connection settings for the Supabase project (GoTrue auth + storage).
#[derive(Clone)]
pub struct SupabaseConfig {
    /// Project URL without a trailing slash, e.g. `https://abc.supabase.co`
    pub url: String,
    /// Service role key, sent as `apikey` on every request
    pub service_key: String,
    /// Per-request timeout for calls to the project
    pub timeout: Duration,
}

impl SupabaseConfig {
    pub fn new(url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.url, path.trim_start_matches('/'))
    }
}

impl fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("service_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Environment variables:
/// - `SUPABASE_URL` (required, http or https)
/// - `SUPABASE_KEY` (required)
/// - `SUPABASE_TIMEOUT_SECS` (default: 10)
#[cfg(feature = "config")]
impl FromEnv for SupabaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = env_required("SUPABASE_URL")?;
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(ConfigError::parse("SUPABASE_URL", "must start with http:// or https://"));
        }
        let service_key = env_required("SUPABASE_KEY")?;
        let timeout = Duration::from_secs(env_parse_or("SUPABASE_TIMEOUT_SECS", 10u64)?);

        Ok(Self::new(url, service_key).with_timeout(timeout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let config = SupabaseConfig::new("https://abc.supabase.co/", "key");
        assert_eq!(config.url, "https://abc.supabase.co");
        assert_eq!(config.endpoint("/auth/v1/user"), "https://abc.supabase.co/auth/v1/user");
    }

    #[test]
    fn test_debug_redacts_service_key() {
        let config = SupabaseConfig::new("https://abc.supabase.co", "super-secret");
        let printed = format!("{config:?}");
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("redacted"));
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_env() {
        temp_env::with_vars(
            [
                ("SUPABASE_URL", Some("https://abc.supabase.co")),
                ("SUPABASE_KEY", Some("service-key")),
                ("SUPABASE_TIMEOUT_SECS", Some("3")),
            ],
            || {
                let config = SupabaseConfig::from_env().unwrap();
                assert_eq!(config.url, "https://abc.supabase.co");
                assert_eq!(config.service_key, "service-key");
                assert_eq!(config.timeout, Duration::from_secs(3));
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_env_missing_key() {
        temp_env::with_vars(
            [
                ("SUPABASE_URL", Some("https://abc.supabase.co")),
                ("SUPABASE_KEY", None),
            ],
            || {
                let err = SupabaseConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("SUPABASE_KEY"));
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_env_rejects_non_http_url() {
        temp_env::with_vars(
            [
                ("SUPABASE_URL", Some("abc.supabase.co")),
                ("SUPABASE_KEY", Some("service-key")),
            ],
            || {
                let err = SupabaseConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("SUPABASE_URL"));
            },
        );
    }
}
