use anyhow::anyhow;
use axum::extract::{FromRequest, Request, rejection::JsonRejection};
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::ValidationErrors;

use crate::utils::errors::AppError;

/// Raw JSON body for partial updates.
///
/// Deserializes to a [`Value`] first: the permission check keys on whether the
/// `role` field *appears* in the payload, which has to be decided before the
/// typed DTO parse.
#[derive(Debug, Clone)]
pub struct PatchBody(pub Value);

impl<S> FromRequest<S> for PatchBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| {
                if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
                    return AppError::bad_request(anyhow!(
                        "Missing 'Content-Type: application/json' header"
                    ));
                }

                AppError::bad_request(anyhow!("Invalid JSON body: {}", rejection.body_text()))
            })?;

        Ok(PatchBody(value))
    }
}

/// Deserializes the typed DTO out of a raw patch body.
pub fn parse_partial<T: DeserializeOwned>(value: Value) -> Result<T, AppError> {
    serde_json::from_value(value)
        .map_err(|e| AppError::bad_request(anyhow!("Invalid field in request body: {e}")))
}

/// Flattens [`ValidationErrors`] into the `{field: [messages]}` map returned
/// to clients.
pub fn field_errors(errors: &ValidationErrors) -> Map<String, Value> {
    let mut map = Map::new();

    for (field, errs) in errors.field_errors() {
        let messages: Vec<Value> = errs
            .iter()
            .map(|error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{field} is invalid"))
                    .into()
            })
            .collect();

        map.insert(field.to_string(), Value::Array(messages));
    }

    map
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;
    use crate::modules::users::model::UpdateUserDto;

    #[test]
    fn test_field_errors_shape() {
        let dto = UpdateUserDto {
            email: Some("not-an-email".to_string()),
            address: Some("x".repeat(101)),
            ..Default::default()
        };

        let errors = dto.validate().unwrap_err();
        let map = field_errors(&errors);

        assert_eq!(
            map["email"],
            serde_json::json!(["Enter a valid email address."])
        );
        assert_eq!(
            map["address"],
            serde_json::json!(["Ensure this field has no more than 100 characters."])
        );
    }

    #[test]
    fn test_parse_partial_rejects_wrong_types() {
        let value = serde_json::json!({"telegram_id": "not-a-number"});
        let result = parse_partial::<UpdateUserDto>(value);
        assert!(result.is_err());
    }
}
