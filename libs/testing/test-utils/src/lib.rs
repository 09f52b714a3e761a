//! Shared test infrastructure
//!
//! - `TestDatabase`: PostgreSQL container with automatic cleanup (feature: "postgres")
//! - `FakeAuthProvider`: wiremock-backed Supabase auth service (feature: "auth")
//! - `TestDataBuilder`: deterministic ids, names and tokens
//! - `assertions`: response header checks
//!
//! ```rust,no_run
//! use test_utils::{FakeAuthProvider, TestDataBuilder};
//!
//! # async fn example() {
//! let data = TestDataBuilder::from_test_name("rejects_unknown_token");
//! let provider = FakeAuthProvider::start()
//!     .await
//!     .with_user(&data.access_token("alice"), &data.user_id().to_string())
//!     .await;
//! # }
//! ```

use uuid::Uuid;

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "auth")]
mod auth_provider;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

#[cfg(feature = "auth")]
pub use auth_provider::{FakeAuthProvider, SERVICE_KEY};

/// Builder for test data with deterministic randomization
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seeds from a hash of the test name so data is stable per test.
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    pub fn user_id(&self) -> Uuid {
        let bytes = self.seed.to_le_bytes();
        let mut uuid_bytes = [0u8; 16];
        uuid_bytes[..8].copy_from_slice(&bytes);
        uuid_bytes[8..16].copy_from_slice(&bytes);
        Uuid::from_bytes(uuid_bytes)
    }

    /// Opaque access token, unique per seed and label.
    pub fn access_token(&self, label: &str) -> String {
        format!("test-token-{}-{}", self.seed, label)
    }

    /// Request correlation id, unique per seed and label.
    pub fn request_id(&self, label: &str) -> String {
        format!("req-{}-{}", self.seed, label)
    }
}

/// Assertions on HTTP response headers.
pub mod assertions {
    use http::HeaderMap;

    pub fn assert_header(headers: &HeaderMap, name: &str, expected: &str) {
        let actual = headers
            .get(name)
            .unwrap_or_else(|| panic!("missing header {name}"))
            .to_str()
            .unwrap_or_else(|_| panic!("header {name} is not valid UTF-8"));
        assert_eq!(actual, expected, "unexpected value for header {name}");
    }

    /// Asserts the four cross-origin headers the API sets on every response.
    pub fn assert_cors_headers(headers: &HeaderMap, origin: &str) {
        assert_header(headers, "access-control-allow-origin", origin);
        assert_header(
            headers,
            "access-control-allow-methods",
            "GET, POST, PUT, DELETE, OPTIONS",
        );
        assert_header(
            headers,
            "access-control-allow-headers",
            "Content-Type, Authorization",
        );
        assert_header(headers, "access-control-allow-credentials", "true");
    }

    /// Returns the `X-Request-ID` value, failing if it is absent or empty.
    pub fn request_id(headers: &HeaderMap) -> String {
        let value = headers
            .get("x-request-id")
            .expect("missing X-Request-ID")
            .to_str()
            .expect("X-Request-ID is not valid UTF-8")
            .to_string();
        assert!(!value.is_empty(), "X-Request-ID is empty");
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{HeaderMap, HeaderValue};

    #[test]
    fn test_data_builder_deterministic() {
        let a = TestDataBuilder::new(42);
        let b = TestDataBuilder::new(42);

        assert_eq!(a.user_id(), b.user_id());
        assert_eq!(a.access_token("alice"), b.access_token("alice"));
        assert_ne!(a.access_token("alice"), a.access_token("bob"));
    }

    #[test]
    fn test_data_builder_different_names() {
        let a = TestDataBuilder::from_test_name("test1");
        let b = TestDataBuilder::from_test_name("test2");

        assert_ne!(a.user_id(), b.user_id());
        assert_ne!(a.request_id("x"), b.request_id("x"));
    }

    #[test]
    fn test_assert_cors_headers_accepts_full_set() {
        let mut headers = HeaderMap::new();
        headers.insert("access-control-allow-origin", HeaderValue::from_static("https://app.test"));
        headers.insert(
            "access-control-allow-methods",
            HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
        );
        headers.insert(
            "access-control-allow-headers",
            HeaderValue::from_static("Content-Type, Authorization"),
        );
        headers.insert("access-control-allow-credentials", HeaderValue::from_static("true"));

        assertions::assert_cors_headers(&headers, "https://app.test");
    }

    #[test]
    #[should_panic(expected = "missing header")]
    fn test_assert_header_panics_when_missing() {
        assertions::assert_header(&HeaderMap::new(), "x-request-id", "abc");
    }
}
