use axum::{
    extract::{FromRequestParts, OriginalUri, Request},
    http::{HeaderName, HeaderValue, Method, StatusCode, Uri, request::Parts},
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;
use std::time::{Duration, Instant};
use tracing::Instrument;
use uuid::Uuid;

/// Paths that are served without timing, request ids or log records.
pub const BYPASS_PATHS: &[&str] = &["/health", "/ready"];

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Correlation id of the current request.
///
/// Set by [`request_logging_middleware`]; available to later middleware via
/// extensions and to handlers as an extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestId>()
            .cloned()
            .unwrap_or_else(|| RequestId(String::new())))
    }
}

/// What the logging middleware observed for one request.
///
/// Attached to response extensions so outer layers and tests can inspect it.
#[derive(Debug, Clone)]
pub struct RequestRecord {
    pub method: Method,
    pub uri: Uri,
    pub status: StatusCode,
    pub duration: Duration,
    pub request_id: String,
}

/// The caller's id, byte for byte. Empty or non-UTF-8 values count as absent.
fn inbound_request_id(request: &Request) -> Option<String> {
    let value = request.headers().get(&REQUEST_ID_HEADER)?.to_str().ok()?;
    (!value.is_empty()).then(|| value.to_string())
}

/// Request logging middleware.
///
/// Outside [`BYPASS_PATHS`] every request gets an `X-Request-ID` (the inbound
/// one unchanged when present, a fresh UUID v4 otherwise), runs inside a span carrying it,
/// and produces exactly one completion record.
pub async fn request_logging_middleware(mut request: Request, next: Next) -> Response {
    // nested routers see a stripped uri
    let uri = request
        .extensions()
        .get::<OriginalUri>()
        .map(|original| original.0.clone())
        .unwrap_or_else(|| request.uri().clone());

    if BYPASS_PATHS.contains(&uri.path()) {
        return next.run(request).await;
    }

    let start = Instant::now();
    let method = request.method().clone();
    let request_id = inbound_request_id(&request).unwrap_or_else(|| Uuid::new_v4().to_string());

    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let span = tracing::info_span!("http_request", request_id = %request_id);
    let mut response = next.run(request).instrument(span).await;

    let status = response.status();
    let duration = start.elapsed();
    let duration_ms = duration.as_secs_f64() * 1000.0;

    // inbound ids came from a valid header value, generated ones are UUIDs
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    if status.is_server_error() {
        tracing::error!(%method, %uri, status = status.as_u16(), duration_ms, %request_id, "Http request completed");
    } else if status.is_client_error() {
        tracing::warn!(%method, %uri, status = status.as_u16(), duration_ms, %request_id, "Http request completed");
    } else {
        tracing::info!(%method, %uri, status = status.as_u16(), duration_ms, %request_id, "Http request completed");
    }

    response.extensions_mut().insert(RequestRecord {
        method,
        uri,
        status,
        duration,
        request_id,
    });

    response
}
