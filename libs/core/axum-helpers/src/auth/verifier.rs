use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts, http::StatusCode, response::Response};
use database::supabase::{SupabaseClient, UserLookupError};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::errors::error_response;

/// Identity resolved from a verified bearer token.
///
/// Inserted into request extensions by the auth middleware; handlers take it
/// as an extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: Option<String>,
}

impl AuthenticatedUser {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            email: None,
        }
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| error_response(StatusCode::UNAUTHORIZED, "Authentication required"))
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authorization header missing")]
    MissingCredential,

    /// The provider refused the credential
    #[error("credential rejected: {0}")]
    Rejected(String),

    /// The provider could not give an answer
    #[error("auth provider unavailable: {0}")]
    Unavailable(String),
}

/// Resolves a raw credential (no `Bearer ` prefix) to a user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify_credential(&self, credential: &str) -> Result<AuthenticatedUser, AuthError>;
}

#[async_trait]
impl CredentialVerifier for SupabaseClient {
    async fn verify_credential(&self, credential: &str) -> Result<AuthenticatedUser, AuthError> {
        let user = self.get_user(credential).await.map_err(|e| match e {
            UserLookupError::Rejected(status) => {
                AuthError::Rejected(format!("provider answered HTTP {status}"))
            }
            UserLookupError::Unavailable(reason) => AuthError::Unavailable(reason),
            UserLookupError::Malformed(reason) => AuthError::Unavailable(reason),
        })?;

        let user_id = Uuid::parse_str(&user.id)
            .map_err(|e| AuthError::Unavailable(format!("user id '{}' is not a UUID: {e}", user.id)))?;

        Ok(AuthenticatedUser {
            user_id,
            email: user.email,
        })
    }
}
