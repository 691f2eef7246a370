//! Claim structure carried by Shelfmark bearer tokens.

use serde::{Deserialize, Serialize};

/// Claims embedded in a signed bearer token.
///
/// A token only resolves to a caller when both `email` and `user_id` match a
/// persisted user exactly; decoding fails outright when either claim is
/// missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Email address the token was issued for
    pub email: String,
    /// Id of the user the token was issued for
    pub user_id: i64,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}
