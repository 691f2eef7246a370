use std::env;

/// Bearer-token configuration.
///
/// The secret never leaves this struct except by injection into the token
/// verifier at startup.
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self {
            secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "shelfmark-dev-secret-change-in-production".to_string()),
        }
    }
}
