//! Token verification for the Shelfmark API.
//!
//! Tokens are HS256 JWTs carrying [`TokenClaims`]. The [`TokenVerifier`] is
//! constructed from the shared secret once, at application startup, and handed
//! to whatever needs to check tokens; nothing in this crate reads the secret
//! from the environment itself.
//!
//! [`sign_claims`] is the counterpart used by the test suites and operational
//! tooling. The API does not issue tokens.

use std::fmt;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use crate::claims::TokenClaims;

/// Reasons a token can be rejected or fail to sign.
///
/// Callers are expected to collapse `Expired` and `Malformed` into a single
/// unauthenticated outcome towards clients; the split exists for server-side
/// logging only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("token malformed or signature invalid")]
    Malformed,
    #[error("token could not be signed")]
    Signing,
}

/// Verifies bearer tokens against an injected shared secret.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
        }
    }

    /// Decodes and validates a token, returning its claims.
    ///
    /// Fails if the signature does not match, the token is expired, the token
    /// is structurally invalid, or a required claim is absent.
    pub fn decode(&self, token: &str) -> Result<TokenClaims, TokenError> {
        decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            })
    }
}

impl fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The decoding key stays out of debug output.
        f.debug_struct("TokenVerifier").finish_non_exhaustive()
    }
}

/// Signs a set of claims into a token valid for `ttl_seconds`.
///
/// A negative `ttl_seconds` produces an already-expired token, which the test
/// suites rely on.
pub fn sign_claims(
    user_id: i64,
    email: &str,
    ttl_seconds: i64,
    secret: &str,
) -> Result<String, TokenError> {
    let now = Utc::now().timestamp();

    let claims = TokenClaims {
        email: email.to_string(),
        user_id,
        exp: (now + ttl_seconds) as usize,
        iat: now as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| TokenError::Signing)
}
