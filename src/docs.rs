use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::users::model::{Role, UpdateUserDto, UserRecord};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
    ),
    components(schemas(UserRecord, UpdateUserDto, Role)),
    modifiers(&SecurityAddon),
    tags(
        (name = "Users", description = "Single-user resource endpoints")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            // Identification travels in a `Bearer: <scheme> <token>` header,
            // not the standard Authorization header.
            components.add_security_scheme(
                "bearer_token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("Bearer"))),
            );
        }
    }
}
