//! # Shelfmark Auth
//!
//! Bearer-token claims and verification for the Shelfmark API.
//!
//! This crate provides:
//!
//! - [`claims`]: the claim structure carried by signed bearer tokens
//! - [`jwt`]: token verification (and a signing helper for tests and tooling)
//!
//! The API only ever *verifies* tokens; there is no issuance endpoint. The
//! shared secret is injected when the [`TokenVerifier`] is constructed rather
//! than read from process-wide state.
//!
//! # Example
//!
//! ```ignore
//! use shelfmark_auth::{TokenVerifier, sign_claims};
//!
//! let verifier = TokenVerifier::new(&jwt_config.secret);
//!
//! let token = sign_claims(42, "reader@example.com", 3600, &jwt_config.secret)?;
//! let claims = verifier.decode(&token)?;
//! assert_eq!(claims.user_id, 42);
//! ```

pub mod claims;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::TokenClaims;
pub use jwt::{TokenError, TokenVerifier, sign_claims};
