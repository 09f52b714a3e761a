use super::verifier::CredentialVerifier;
use crate::errors::error_response;
use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

pub const MISSING_HEADER_MESSAGE: &str = "Authorization header missing";
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid or expired token";

/// Removes a leading `Bearer ` if present. Anything else is returned as-is.
pub fn strip_bearer(value: &str) -> &str {
    value.strip_prefix("Bearer ").unwrap_or(value)
}

/// Bearer authentication middleware.
///
/// Resolves the `Authorization` credential through the verifier and inserts
/// the resulting [`AuthenticatedUser`](super::AuthenticatedUser) into request
/// extensions. Requests that fail never reach the wrapped handler.
///
/// # Example
///
/// ```ignore
/// use axum_helpers::auth::{CredentialVerifier, bearer_auth_middleware};
///
/// let verifier: Arc<dyn CredentialVerifier> = Arc::new(supabase_client);
///
/// let protected = Router::new()
///     .route("/me", get(me))
///     .layer(axum::middleware::from_fn_with_state(verifier, bearer_auth_middleware));
/// ```
pub async fn bearer_auth_middleware(
    State(verifier): State<Arc<dyn CredentialVerifier>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(value) = request.headers().get(header::AUTHORIZATION) else {
        tracing::error!(uri = %request.uri(), "Authorization header missing");
        return error_response(StatusCode::UNAUTHORIZED, MISSING_HEADER_MESSAGE);
    };

    let Ok(value) = value.to_str() else {
        tracing::error!(uri = %request.uri(), "Authorization header is not valid ASCII");
        return error_response(StatusCode::UNAUTHORIZED, INVALID_TOKEN_MESSAGE);
    };

    if value.is_empty() {
        tracing::error!(uri = %request.uri(), "Authorization header is empty");
        return error_response(StatusCode::UNAUTHORIZED, MISSING_HEADER_MESSAGE);
    }

    let credential = strip_bearer(value).trim();
    if credential.is_empty() {
        tracing::error!(uri = %request.uri(), "Bearer credential is empty");
        return error_response(StatusCode::UNAUTHORIZED, INVALID_TOKEN_MESSAGE);
    }

    match verifier.verify_credential(credential).await {
        Ok(user) => {
            tracing::debug!(user_id = %user.user_id, "Request authenticated");
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => {
            tracing::error!(uri = %request.uri(), error = %e, "Token verification failed");
            error_response(StatusCode::UNAUTHORIZED, INVALID_TOKEN_MESSAGE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verifier::{AuthError, AuthenticatedUser, MockCredentialVerifier};
    use crate::errors::ErrorResponse;
    use axum::{Router, body::Body, http::Request as HttpRequest, middleware, routing::get};
    use http_body_util::BodyExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;
    use uuid::Uuid;

    fn app(verifier: MockCredentialVerifier, calls: Arc<AtomicUsize>) -> Router {
        let verifier: Arc<dyn CredentialVerifier> = Arc::new(verifier);
        Router::new()
            .route(
                "/protected",
                get(move |user: AuthenticatedUser| {
                    let calls = calls.clone();
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        user.user_id.to_string()
                    }
                }),
            )
            .layer(middleware::from_fn_with_state(verifier, bearer_auth_middleware))
    }

    async fn error_body(response: Response) -> ErrorResponse {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_strip_bearer() {
        assert_eq!(strip_bearer("Bearer abc"), "abc");
        assert_eq!(strip_bearer("abc"), "abc");
        assert_eq!(strip_bearer("bearer abc"), "bearer abc");
        assert_eq!(strip_bearer("Bearer "), "");
    }

    #[tokio::test]
    async fn test_missing_header_is_rejected_before_the_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut verifier = MockCredentialVerifier::new();
        verifier.expect_verify_credential().never();

        let response = app(verifier, calls.clone())
            .oneshot(HttpRequest::get("/protected").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = error_body(response).await;
        assert_eq!(body.message, MISSING_HEADER_MESSAGE);
        assert_eq!(body.code, 401);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rejected_credential_is_401() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut verifier = MockCredentialVerifier::new();
        verifier
            .expect_verify_credential()
            .withf(|credential| credential == "revoked")
            .times(1)
            .returning(|_| Err(AuthError::Rejected("provider answered HTTP 401".into())));

        let response = app(verifier, calls.clone())
            .oneshot(
                HttpRequest::get("/protected")
                    .header("authorization", "Bearer revoked")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let message = error_body(response).await.message.to_lowercase();
        assert!(message.contains("invalid"));
        assert!(message.contains("token"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_provider_outage_is_401_not_500() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut verifier = MockCredentialVerifier::new();
        verifier
            .expect_verify_credential()
            .returning(|_| Err(AuthError::Unavailable("connection refused".into())));

        let response = app(verifier, calls.clone())
            .oneshot(
                HttpRequest::get("/protected")
                    .header("authorization", "Bearer anything")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_body(response).await.message, INVALID_TOKEN_MESSAGE);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_bearer_never_reaches_the_verifier() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut verifier = MockCredentialVerifier::new();
        verifier.expect_verify_credential().never();

        let response = app(verifier, calls.clone())
            .oneshot(
                HttpRequest::get("/protected")
                    .header("authorization", "Bearer ")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_verified_identity_reaches_the_handler() {
        let user_id = Uuid::new_v4();
        let calls = Arc::new(AtomicUsize::new(0));
        let mut verifier = MockCredentialVerifier::new();
        verifier
            .expect_verify_credential()
            .withf(|credential| credential == "good-token")
            .times(1)
            .returning(move |_| Ok(AuthenticatedUser::new(user_id)));

        let response = app(verifier, calls.clone())
            .oneshot(
                HttpRequest::get("/protected")
                    .header("authorization", "Bearer good-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(bytes, user_id.to_string().as_bytes());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
