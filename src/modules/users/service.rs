use anyhow::anyhow;
use serde_json::Value;
use validator::Validate;

use crate::middleware::auth::Identity;
use crate::utils::errors::AppError;
use crate::validator::field_errors;

use super::model::{UpdateUserDto, UserRecord};
use super::store::{UserChanges, UserStore};

pub struct UserService;

impl UserService {
    /// Fetches one user by id, with the computed order ids.
    pub async fn fetch(store: &dyn UserStore, id: i64) -> Result<UserRecord, AppError> {
        let user = store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("User with id {id} not found")))?;

        let orders = store.order_ids(id).await?;
        Ok(UserRecord::from_user(user, orders))
    }

    /// Applies a partial update.
    ///
    /// Field validation runs for every caller. Persistence only happens for a
    /// Librarian: a non-Librarian's valid self-update is accepted without
    /// being written, which clients of this API have come to depend on.
    pub async fn update(
        store: &dyn UserStore,
        id: i64,
        caller: &Identity,
        dto: UpdateUserDto,
    ) -> Result<(), AppError> {
        if store.find_by_id(id).await?.is_none() {
            return Err(AppError::not_found(anyhow!("User with id {id} not found")));
        }

        Self::validate_update(store, id, &dto).await?;

        if !caller.role.is_librarian() {
            return Ok(());
        }

        let changes = UserChanges {
            email: dto.email,
            role: dto.role,
            first_name: dto.first_name,
            last_name: dto.last_name,
            address: dto.address,
            phone: dto.phone,
            username: dto.username,
            telegram_id: dto.telegram_id,
        };
        store.update(id, &changes).await?;

        Ok(())
    }

    /// Deletes one user, returning the record as it was before the delete.
    pub async fn delete(store: &dyn UserStore, id: i64) -> Result<UserRecord, AppError> {
        let user = store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("User with id {id} not found")))?;

        // Snapshot first; the response echoes the deleted record.
        let snapshot = UserRecord::from_user(user, store.order_ids(id).await?);
        store.delete(id).await?;

        Ok(snapshot)
    }

    /// Declared DTO constraints plus the store-backed phone checks, merged
    /// into one field-error map.
    async fn validate_update(
        store: &dyn UserStore,
        id: i64,
        dto: &UpdateUserDto,
    ) -> Result<(), AppError> {
        let mut errors = match dto.validate() {
            Ok(()) => serde_json::Map::new(),
            Err(e) => field_errors(&e),
        };

        if let Some(phone) = dto.phone.as_deref() {
            let mut phone_errors = Vec::new();

            if !phone.chars().all(|c| c.is_ascii_digit()) {
                phone_errors.push(Value::from("A valid number is required."));
            } else if store.phone_taken(phone, id).await? {
                phone_errors.push(Value::from("user with this phone already exists."));
            }

            if !phone_errors.is_empty() {
                match errors.get_mut("phone") {
                    Some(Value::Array(existing)) => existing.extend(phone_errors),
                    _ => {
                        errors.insert("phone".to_string(), Value::Array(phone_errors));
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(Value::Object(errors)))
        }
    }
}
