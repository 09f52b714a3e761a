//! In-process stand-in for the Supabase auth service.

use database::supabase::SupabaseConfig;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const SERVICE_KEY: &str = "test-service-key";

/// Answers `/auth/v1/health` and `/auth/v1/user` like GoTrue.
///
/// Tokens are unknown (HTTP 401) until registered with [`with_user`].
///
/// [`with_user`]: FakeAuthProvider::with_user
pub struct FakeAuthProvider {
    server: MockServer,
}

impl FakeAuthProvider {
    pub async fn start() -> Self {
        let provider = Self::start_without_health().await;
        provider.mount_health(200).await;
        provider
    }

    /// Health answers 503 on every call.
    pub async fn start_unhealthy() -> Self {
        let provider = Self::start_without_health().await;
        provider.mount_health(503).await;
        provider
    }

    /// Health answers 503 for the first `failures` calls, then 200.
    pub async fn start_flaky(failures: u64) -> Self {
        let provider = Self::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/health"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(failures)
            .with_priority(1)
            .mount(&provider.server)
            .await;
        provider
    }

    async fn start_without_health() -> Self {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "code": 401,
                "msg": "invalid JWT: unable to parse or verify signature"
            })))
            .with_priority(u8::MAX)
            .mount(&server)
            .await;

        Self { server }
    }

    async fn mount_health(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path("/auth/v1/health"))
            .and(header("apikey", SERVICE_KEY))
            .respond_with(ResponseTemplate::new(status).set_body_json(serde_json::json!({
                "name": "GoTrue",
                "description": "fake auth provider"
            })))
            .mount(&self.server)
            .await;
    }

    /// Makes `token` resolve to `user_id`.
    pub async fn with_user(self, token: &str, user_id: &str) -> Self {
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .and(header("authorization", format!("Bearer {token}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": user_id,
                "aud": "authenticated",
                "role": "authenticated",
                "email": format!("{user_id}@example.com")
            })))
            .with_priority(1)
            .mount(&self.server)
            .await;
        self
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn supabase_config(&self) -> SupabaseConfig {
        SupabaseConfig::new(self.uri(), SERVICE_KEY).with_timeout(Duration::from_secs(2))
    }

    /// Number of `/auth/v1/user` lookups received so far.
    pub async fn user_lookups(&self) -> usize {
        self.requests_to("/auth/v1/user").await
    }

    /// Number of `/auth/v1/health` probes received so far.
    pub async fn health_checks(&self) -> usize {
        self.requests_to("/auth/v1/health").await
    }

    async fn requests_to(&self, endpoint: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == endpoint)
            .count()
    }
}
