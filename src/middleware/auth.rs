use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header, request::Parts};
use tracing::debug;

use shelfmark_auth::TokenVerifier;

use crate::modules::users::model::Role;
use crate::modules::users::store::UserStore;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Name of the identification header. Its value is `<scheme> <token>`.
pub const BEARER_HEADER: &str = "bearer";

/// Caller identity resolved from a bearer token; lives for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

/// Outcome of token resolution.
///
/// Every failure mode (missing or malformed header, expired or tampered
/// token, missing claims, no matching user) collapses to `Failed`. The cause
/// is logged server-side and never reported to the client.
#[derive(Debug, Clone)]
pub enum AuthOutcome {
    Resolved(Identity),
    Failed,
}

/// Resolves the request's bearer token to a caller identity.
///
/// Pure read: no side effects beyond the store lookup.
pub async fn resolve(
    headers: &HeaderMap,
    verifier: &TokenVerifier,
    store: &dyn UserStore,
) -> AuthOutcome {
    // Requests without a Host header did not come through the API surface.
    if !headers.contains_key(header::HOST) {
        debug!("caller resolution skipped: no host header");
        return AuthOutcome::Failed;
    }

    let Some(raw) = headers
        .get(BEARER_HEADER)
        .and_then(|value| value.to_str().ok())
    else {
        debug!("caller resolution failed: missing bearer header");
        return AuthOutcome::Failed;
    };

    // The token is the second whitespace-delimited field of the header value.
    let Some(token) = raw.split_whitespace().nth(1) else {
        debug!("caller resolution failed: malformed bearer header");
        return AuthOutcome::Failed;
    };

    let claims = match verifier.decode(token) {
        Ok(claims) => claims,
        Err(err) => {
            debug!(%err, "caller resolution failed: token rejected");
            return AuthOutcome::Failed;
        }
    };

    // The token identifies a caller only when both decoded claims match a
    // persisted user exactly.
    match store.find_by_email_and_id(&claims.email, claims.user_id).await {
        Ok(Some(user)) => AuthOutcome::Resolved(Identity {
            id: user.id,
            email: user.email,
            role: user.role,
        }),
        Ok(None) => {
            debug!(
                user_id = claims.user_id,
                "caller resolution failed: no matching user"
            );
            AuthOutcome::Failed
        }
        Err(err) => {
            debug!(%err, "caller resolution failed: store error");
            AuthOutcome::Failed
        }
    }
}

/// Extractor that resolves the calling user or rejects with 401.
#[derive(Debug, Clone)]
pub struct Caller(pub Identity);

impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match resolve(&parts.headers, &state.verifier, state.store.as_ref()).await {
            AuthOutcome::Resolved(identity) => Ok(Caller(identity)),
            AuthOutcome::Failed => Err(AppError::unauthorized(anyhow::anyhow!(
                "could not resolve caller identity"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use chrono::Utc;
    use shelfmark_auth::sign_claims;

    use super::*;
    use crate::modules::users::model::User;
    use crate::modules::users::store::MemoryUserStore;

    const SECRET: &str = "test_secret_key_for_testing_purposes";

    fn seeded_store() -> MemoryUserStore {
        let store = MemoryUserStore::new();
        store.seed_user(User {
            id: 7,
            username: "reader".to_string(),
            email: "reader@example.com".to_string(),
            role: Role::Basic,
            first_name: "Test".to_string(),
            last_name: "Reader".to_string(),
            address: "No address".to_string(),
            phone: "00000000007".to_string(),
            telegram_id: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
        store
    }

    fn headers(bearer: Option<&str>, host: bool) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if host {
            headers.insert(header::HOST, HeaderValue::from_static("api.test"));
        }
        if let Some(value) = bearer {
            headers.insert(BEARER_HEADER, HeaderValue::from_str(value).unwrap());
        }
        headers
    }

    #[tokio::test]
    async fn test_resolve_success() {
        let store = seeded_store();
        let verifier = TokenVerifier::new(SECRET);
        let token = sign_claims(7, "reader@example.com", 3600, SECRET).unwrap();

        let outcome = resolve(&headers(Some(&format!("JWT {token}")), true), &verifier, &store).await;

        match outcome {
            AuthOutcome::Resolved(identity) => {
                assert_eq!(identity.id, 7);
                assert_eq!(identity.role, Role::Basic);
            }
            AuthOutcome::Failed => panic!("expected resolution to succeed"),
        }
    }

    #[tokio::test]
    async fn test_resolve_requires_host_header() {
        let store = seeded_store();
        let verifier = TokenVerifier::new(SECRET);
        let token = sign_claims(7, "reader@example.com", 3600, SECRET).unwrap();

        let outcome =
            resolve(&headers(Some(&format!("JWT {token}")), false), &verifier, &store).await;
        assert!(matches!(outcome, AuthOutcome::Failed));
    }

    #[tokio::test]
    async fn test_resolve_rejects_header_without_token_field() {
        let store = seeded_store();
        let verifier = TokenVerifier::new(SECRET);

        let outcome = resolve(&headers(Some("JWT"), true), &verifier, &store).await;
        assert!(matches!(outcome, AuthOutcome::Failed));

        let outcome = resolve(&headers(None, true), &verifier, &store).await;
        assert!(matches!(outcome, AuthOutcome::Failed));
    }

    #[tokio::test]
    async fn test_resolve_rejects_unknown_user() {
        let store = seeded_store();
        let verifier = TokenVerifier::new(SECRET);

        // Valid signature, but no user with this id exists.
        let token = sign_claims(999999, "reader@example.com", 3600, SECRET).unwrap();
        let outcome = resolve(&headers(Some(&format!("JWT {token}")), true), &verifier, &store).await;
        assert!(matches!(outcome, AuthOutcome::Failed));
    }

    #[tokio::test]
    async fn test_resolve_rejects_mismatched_email() {
        let store = seeded_store();
        let verifier = TokenVerifier::new(SECRET);

        let token = sign_claims(7, "someone-else@example.com", 3600, SECRET).unwrap();
        let outcome = resolve(&headers(Some(&format!("JWT {token}")), true), &verifier, &store).await;
        assert!(matches!(outcome, AuthOutcome::Failed));
    }

    #[tokio::test]
    async fn test_resolve_rejects_expired_token() {
        let store = seeded_store();
        let verifier = TokenVerifier::new(SECRET);

        let token = sign_claims(7, "reader@example.com", -3600, SECRET).unwrap();
        let outcome = resolve(&headers(Some(&format!("JWT {token}")), true), &verifier, &store).await;
        assert!(matches!(outcome, AuthOutcome::Failed));
    }
}
