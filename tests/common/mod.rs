//! Shared helpers for the integration suites.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use http_body_util::BodyExt;
use serde_json::Value;

use shelfmark::config::cors::CorsConfig;
use shelfmark::modules::users::model::{Role, User};
use shelfmark::modules::users::store::MemoryUserStore;
use shelfmark::router::init_router;
use shelfmark::state::AppState;
use shelfmark_auth::{TokenVerifier, sign_claims};

pub const TEST_SECRET: &str = "shelfmark-test-secret";

pub fn test_user(id: i64, role: Role) -> User {
    User {
        id,
        username: format!("user{id}"),
        email: format!("user{id}@example.com"),
        role,
        first_name: "Test".to_string(),
        last_name: format!("User{id}"),
        address: "No address".to_string(),
        phone: format!("{id:011}"),
        telegram_id: 0,
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    }
}

pub fn setup_test_app(store: Arc<MemoryUserStore>) -> Router {
    let state = AppState {
        store,
        verifier: TokenVerifier::new(TEST_SECRET),
        cors_config: CorsConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
    };
    init_router(state)
}

pub fn token_for(user: &User) -> String {
    sign_claims(user.id, &user.email, 3600, TEST_SECRET).unwrap()
}

/// Builds a request with the Host header set and, when given, the
/// `Bearer: JWT <token>` identification header.
pub fn api_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::HOST, "api.shelfmark.test");

    if let Some(token) = token {
        builder = builder.header("bearer", format!("JWT {token}"));
    }

    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
