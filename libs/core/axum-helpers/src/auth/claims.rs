//! Reading token claims without verifying them.
//!
//! Nothing here proves a token is authentic. Use it for routing hints and
//! diagnostics only; access decisions go through the auth middleware.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde_json::{Map, Value};
use thiserror::Error;

use super::middleware::strip_bearer;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClaimsError {
    #[error("token is empty")]
    Empty,

    #[error("failed to parse token: {0}")]
    Malformed(String),
}

/// Unverified claim set of a JWT.
pub type Claims = Map<String, Value>;

/// Decodes the payload of `credential`, with or without a `Bearer ` prefix.
///
/// Signature, expiry and audience are not checked.
pub fn extract_claims(credential: &str) -> Result<Claims, ClaimsError> {
    let token = strip_bearer(credential).trim();
    if token.is_empty() {
        return Err(ClaimsError::Empty);
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| ClaimsError::Malformed(e.to_string()))
}
