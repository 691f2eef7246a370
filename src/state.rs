use std::sync::Arc;

use shelfmark_auth::TokenVerifier;

use crate::config::cors::CorsConfig;
use crate::config::database::init_db_pool;
use crate::config::jwt::JwtConfig;
use crate::modules::users::store::{PgUserStore, UserStore};

#[derive(Clone, Debug)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub verifier: TokenVerifier,
    pub cors_config: CorsConfig,
}

pub async fn init_app_state() -> AppState {
    let jwt_config = JwtConfig::from_env();

    AppState {
        store: Arc::new(PgUserStore::new(init_db_pool().await)),
        verifier: TokenVerifier::new(&jwt_config.secret),
        cors_config: CorsConfig::from_env(),
    }
}
