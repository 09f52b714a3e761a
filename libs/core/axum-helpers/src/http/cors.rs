use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use core_config::{ConfigError, FromEnv, env_optional};

pub const DEFAULT_ALLOWED_ORIGIN: &str = "https://localhost:3000";
pub const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
pub const ALLOWED_HEADERS: &str = "Content-Type, Authorization";

/// Cross-origin settings.
///
/// Loaded from `FRONTEND_URL`; unset or blank falls back to
/// [`DEFAULT_ALLOWED_ORIGIN`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origin: String,
}

impl CorsConfig {
    pub fn new(allowed_origin: impl Into<String>) -> Self {
        let allowed_origin = allowed_origin.into();
        let allowed_origin = if allowed_origin.trim().is_empty() {
            DEFAULT_ALLOWED_ORIGIN.to_string()
        } else {
            allowed_origin.trim().to_string()
        };
        Self { allowed_origin }
    }

    pub fn policy(&self) -> Result<CorsPolicy, ConfigError> {
        HeaderValue::from_str(&self.allowed_origin)
            .map(|origin| CorsPolicy { origin })
            .map_err(|e| ConfigError::parse("FRONTEND_URL", e))
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_ORIGIN)
    }
}

impl FromEnv for CorsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let config = Self::new(env_optional("FRONTEND_URL")?.unwrap_or_default());
        config.policy()?;
        Ok(config)
    }
}

/// Validated header values for [`cors_middleware`].
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    origin: HeaderValue,
}

impl CorsPolicy {
    pub fn origin(&self) -> &HeaderValue {
        &self.origin
    }

    fn apply(&self, headers: &mut HeaderMap) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, self.origin.clone());
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
    }
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self {
            origin: HeaderValue::from_static(DEFAULT_ALLOWED_ORIGIN),
        }
    }
}

/// Sets the CORS headers on every response and answers preflight requests.
///
/// `OPTIONS` gets `204 No Content` and never reaches the inner service.
pub async fn cors_middleware(
    State(policy): State<CorsPolicy>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };

    policy.apply(response.headers_mut());
    response
}
