use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::SupabaseConfig;
use crate::common::{DatabaseError, DatabaseResult};

const USER_PATH: &str = "auth/v1/user";
const HEALTH_PATH: &str = "auth/v1/health";

/// User record returned by `GET /auth/v1/user`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RemoteUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Why a bearer token could not be resolved to a user.
#[derive(Debug, thiserror::Error)]
pub enum UserLookupError {
    /// The provider answered and refused the token
    #[error("token rejected by auth provider (HTTP {0})")]
    Rejected(u16),

    /// The provider could not be reached or answered unexpectedly
    #[error("auth provider unavailable: {0}")]
    Unavailable(String),

    #[error("unexpected user payload: {0}")]
    Malformed(String),
}

/// Authenticated HTTP client for the Supabase project.
///
/// Cloning is cheap; clones share one connection pool.
#[derive(Clone, Debug)]
pub struct SupabaseClient {
    http: reqwest::Client,
    config: SupabaseConfig,
}

impl SupabaseClient {
    /// Builds the client. No network traffic happens here.
    pub fn new(config: &SupabaseConfig) -> DatabaseResult<Self> {
        let mut api_key = HeaderValue::from_str(&config.service_key)
            .map_err(|e| DatabaseError::ConfigError(format!("invalid service key: {e}")))?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("apikey", api_key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| DatabaseError::ConfigError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    /// Authenticated liveness round-trip against the auth service.
    #[instrument(skip(self), fields(url = %self.config.url))]
    pub async fn check_health(&self) -> DatabaseResult<()> {
        let response = self
            .http
            .get(self.config.endpoint(HEALTH_PATH))
            .bearer_auth(&self.config.service_key)
            .send()
            .await
            .map_err(|e| DatabaseError::Remote(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DatabaseError::HealthCheckFailed(format!(
                "Supabase auth health returned HTTP {}",
                status.as_u16()
            )));
        }

        debug!("Supabase health check passed");
        Ok(())
    }

    /// Resolves an access token to the user it was issued for.
    ///
    /// `access_token` must not carry a `Bearer ` prefix.
    pub async fn get_user(&self, access_token: &str) -> Result<RemoteUser, UserLookupError> {
        let response = self
            .http
            .get(self.config.endpoint(USER_PATH))
            .header(AUTHORIZATION, format!("Bearer {access_token}"))
            .send()
            .await
            .map_err(|e| UserLookupError::Unavailable(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {
                let user: RemoteUser = response
                    .json()
                    .await
                    .map_err(|e| UserLookupError::Malformed(e.to_string()))?;
                if user.id.trim().is_empty() {
                    return Err(UserLookupError::Malformed("empty user id".to_string()));
                }
                Ok(user)
            }
            status @ (StatusCode::UNAUTHORIZED
            | StatusCode::FORBIDDEN
            | StatusCode::BAD_REQUEST
            | StatusCode::NOT_FOUND
            | StatusCode::UNPROCESSABLE_ENTITY) => Err(UserLookupError::Rejected(status.as_u16())),
            status => Err(UserLookupError::Unavailable(format!("HTTP {}", status.as_u16()))),
        }
    }
}
