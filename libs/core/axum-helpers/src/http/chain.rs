//! Composition of the per-request middleware.
//!
//! Protected routes run `logging -> cors -> timeout -> auth -> handler`;
//! public routes skip auth. The order is fixed here so applications cannot
//! get it wrong. The timeout sits inside logging and CORS so a 408 still
//! carries the request id and CORS headers and is logged once, and it bounds
//! the remote token check as well as the handler.

use super::cors::{CorsPolicy, cors_middleware};
use super::logging::request_logging_middleware;
use crate::auth::{CredentialVerifier, bearer_auth_middleware};
use axum::{Router, http::StatusCode, middleware};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;

/// Everything the middleware chain needs at request time.
#[derive(Clone)]
pub struct ChainConfig {
    pub cors: CorsPolicy,
    pub verifier: Arc<dyn CredentialVerifier>,
    /// Handler deadline; exceeding it answers 408.
    pub request_timeout: Option<Duration>,
}

impl ChainConfig {
    pub fn new(cors: CorsPolicy, verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self {
            cors,
            verifier,
            request_timeout: None,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}

fn with_timeout<S>(router: Router<S>, timeout: Option<Duration>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    match timeout {
        Some(timeout) => router.layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        )),
        None => router,
    }
}

/// Wraps every route of `router` in logging, CORS, the request timeout and
/// bearer auth, outermost first.
pub fn protect<S>(router: Router<S>, config: &ChainConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let router = router.layer(middleware::from_fn_with_state(
        config.verifier.clone(),
        bearer_auth_middleware,
    ));

    with_timeout(router, config.request_timeout).layer(
        ServiceBuilder::new()
            .layer(middleware::from_fn(request_logging_middleware))
            .layer(middleware::from_fn_with_state(
                config.cors.clone(),
                cors_middleware,
            )),
    )
}

/// Wraps every route of `router` in logging, CORS and the request timeout.
pub fn public<S>(router: Router<S>, config: &ChainConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    with_timeout(router, config.request_timeout).layer(
        ServiceBuilder::new()
            .layer(middleware::from_fn(request_logging_middleware))
            .layer(middleware::from_fn_with_state(
                config.cors.clone(),
                cors_middleware,
            )),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthError, AuthenticatedUser, verifier::MockCredentialVerifier};
    use crate::errors::ErrorResponse;
    use crate::http::cors::CorsConfig;
    use crate::http::logging::{RequestId, RequestRecord};
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
        routing::get,
    };
    use http_body_util::BodyExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use test_utils::assertions;
    use tower::ServiceExt;
    use uuid::Uuid;

    const ORIGIN: &str = "https://feast.example";

    fn chain(verifier: MockCredentialVerifier) -> ChainConfig {
        ChainConfig::new(CorsConfig::new(ORIGIN).policy().unwrap(), Arc::new(verifier))
    }

    fn api(verifier: MockCredentialVerifier, calls: Arc<AtomicUsize>) -> Router {
        let config = chain(verifier);
        let routes = Router::new().route(
            "/test",
            get(move |user: AuthenticatedUser, request_id: RequestId| {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    format!("{} {}", user.user_id, request_id.as_str())
                }
            }),
        );
        Router::new().nest("/api", protect(routes, &config))
    }

    #[tokio::test]
    async fn test_unauthenticated_request_through_full_chain() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut verifier = MockCredentialVerifier::new();
        verifier.expect_verify_credential().never();

        let response = api(verifier, calls.clone())
            .oneshot(Request::get("/api/test").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assertions::request_id(response.headers());
        assertions::assert_cors_headers(response.headers(), ORIGIN);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.status, "error");
        assert_eq!(body.code, 401);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_preflight_never_reaches_auth() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut verifier = MockCredentialVerifier::new();
        verifier.expect_verify_credential().never();

        let response = api(verifier, calls.clone())
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assertions::assert_cors_headers(response.headers(), ORIGIN);
        assertions::request_id(response.headers());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_authenticated_request_sees_identity_and_request_id() {
        let user_id = Uuid::new_v4();
        let calls = Arc::new(AtomicUsize::new(0));
        let mut verifier = MockCredentialVerifier::new();
        verifier
            .expect_verify_credential()
            .times(1)
            .returning(move |_| Ok(AuthenticatedUser::new(user_id)));

        let response = api(verifier, calls.clone())
            .oneshot(
                Request::get("/api/test")
                    .header("authorization", "Bearer good")
                    .header("x-request-id", "trace-abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assertions::assert_header(response.headers(), "x-request-id", "trace-abc");
        assertions::assert_cors_headers(response.headers(), ORIGIN);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(bytes, format!("{user_id} trace-abc").as_bytes());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_verifier_failure_keeps_cors_and_request_id() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut verifier = MockCredentialVerifier::new();
        verifier
            .expect_verify_credential()
            .returning(|_| Err(AuthError::Unavailable("connection refused".into())));

        let response = api(verifier, calls.clone())
            .oneshot(
                Request::get("/api/test")
                    .header("authorization", "Bearer whatever")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assertions::assert_cors_headers(response.headers(), ORIGIN);
        assertions::request_id(response.headers());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_public_routes_skip_auth() {
        let mut verifier = MockCredentialVerifier::new();
        verifier.expect_verify_credential().never();
        let routes = Router::new().route("/status", get(|| async { "up" }));
        let app = public(routes, &chain(verifier));

        let response = app
            .oneshot(Request::get("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assertions::assert_cors_headers(response.headers(), ORIGIN);
        assertions::request_id(response.headers());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_out_request_is_still_logged_with_cors() {
        let mut verifier = MockCredentialVerifier::new();
        verifier
            .expect_verify_credential()
            .returning(|_| Ok(AuthenticatedUser::new(Uuid::new_v4())));
        let config = chain(verifier).with_request_timeout(Duration::from_millis(50));
        let routes = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                "late"
            }),
        );
        let app = Router::new().nest("/api", protect(routes, &config));

        let response = app
            .oneshot(
                Request::get("/api/slow")
                    .header("authorization", "Bearer good")
                    .header("x-request-id", "slow-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assertions::assert_header(response.headers(), "x-request-id", "slow-1");
        assertions::assert_cors_headers(response.headers(), ORIGIN);
        let record = response.extensions().get::<RequestRecord>().unwrap();
        assert_eq!(record.status, StatusCode::REQUEST_TIMEOUT);
    }
}
