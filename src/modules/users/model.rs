//! User data model and DTOs.
//!
//! This module contains the data structures for the user resource:
//!
//! - [`Role`] - the closed set of privilege roles, ordered by rank
//! - [`User`] - the persisted user entity
//! - [`UserRecord`] - the serialized representation returned to clients
//! - [`UpdateUserDto`] - partial update payload with field constraints

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Privilege roles, ordered by rank.
///
/// Librarian is the administrative role with unrestricted access to the user
/// resource; every other role is "regular" and may only act on its own record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
pub enum Role {
    Basic,
    Instructor,
    TeachingAssistant,
    VisitingProfessor,
    Professor,
    Librarian,
}

impl Role {
    /// Explicit privilege rank; a higher rank outranks a lower one.
    pub fn rank(self) -> u8 {
        match self {
            Role::Basic => 0,
            Role::Instructor => 1,
            Role::TeachingAssistant => 2,
            Role::VisitingProfessor => 3,
            Role::Professor => 4,
            Role::Librarian => 5,
        }
    }

    pub fn is_librarian(self) -> bool {
        self == Role::Librarian
    }

    /// All roles, lowest rank first.
    pub fn all() -> [Role; 6] {
        [
            Role::Basic,
            Role::Instructor,
            Role::TeachingAssistant,
            Role::VisitingProfessor,
            Role::Professor,
            Role::Librarian,
        ]
    }
}

impl PartialOrd for Role {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Role {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

/// A library user as persisted in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub phone: String,
    pub telegram_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Wire representation of a user, carried in the `data` envelope.
///
/// `orders` is computed from the orders table at serialization time and lists
/// the ids of the user's book orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub phone: String,
    pub username: String,
    pub orders: Vec<i64>,
    pub telegram_id: i64,
}

impl UserRecord {
    pub fn from_user(user: User, orders: Vec<i64>) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
            first_name: user.first_name,
            last_name: user.last_name,
            address: user.address,
            phone: user.phone,
            username: user.username,
            orders,
            telegram_id: user.telegram_id,
        }
    }
}

/// DTO for partially updating a user.
///
/// Every field is optional; absent fields leave the column untouched. Phone
/// digit format and uniqueness are checked in the service layer against the
/// store, on top of the declared constraints.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    pub role: Option<Role>,
    #[validate(length(
        max = 150,
        message = "Ensure this field has no more than 150 characters."
    ))]
    pub first_name: Option<String>,
    #[validate(length(
        max = 150,
        message = "Ensure this field has no more than 150 characters."
    ))]
    pub last_name: Option<String>,
    #[validate(length(
        max = 100,
        message = "Ensure this field has no more than 100 characters."
    ))]
    pub address: Option<String>,
    #[validate(length(max = 11, message = "Ensure this field has no more than 11 characters."))]
    pub phone: Option<String>,
    #[validate(length(
        min = 1,
        max = 150,
        message = "Ensure this field has between 1 and 150 characters."
    ))]
    pub username: Option<String>,
    pub telegram_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_rank_ordering() {
        assert!(Role::Basic < Role::Instructor);
        assert!(Role::Instructor < Role::TeachingAssistant);
        assert!(Role::TeachingAssistant < Role::VisitingProfessor);
        assert!(Role::VisitingProfessor < Role::Professor);
        assert!(Role::Professor < Role::Librarian);
        assert_eq!(Role::Librarian.rank(), 5);
    }

    #[test]
    fn test_only_librarian_is_librarian() {
        for role in Role::all() {
            assert_eq!(role.is_librarian(), role == Role::Librarian);
        }
    }

    #[test]
    fn test_role_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Role::TeachingAssistant).unwrap(),
            r#""teaching_assistant""#
        );
        assert_eq!(
            serde_json::to_string(&Role::Librarian).unwrap(),
            r#""librarian""#
        );
    }

    #[test]
    fn test_role_rejects_unknown_values() {
        assert!(serde_json::from_str::<Role>(r#""emperor""#).is_err());
        assert!(serde_json::from_str::<Role>("300").is_err());
    }

    #[test]
    fn test_update_dto_validation() {
        let dto = UpdateUserDto {
            first_name: Some("Jane".to_string()),
            email: Some("jane@example.com".to_string()),
            ..Default::default()
        };
        assert!(dto.validate().is_ok());

        let dto_bad_email = UpdateUserDto {
            email: Some("not-an-email".to_string()),
            ..Default::default()
        };
        assert!(dto_bad_email.validate().is_err());

        let dto_long_address = UpdateUserDto {
            address: Some("x".repeat(101)),
            ..Default::default()
        };
        assert!(dto_long_address.validate().is_err());

        let dto_empty_username = UpdateUserDto {
            username: Some(String::new()),
            ..Default::default()
        };
        assert!(dto_empty_username.validate().is_err());
    }

    #[test]
    fn test_update_dto_ignores_unknown_fields() {
        let json = r#"{"first_name":"Jane","favourite_shelf":"42B"}"#;
        let dto: UpdateUserDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.first_name.as_deref(), Some("Jane"));
    }

    #[test]
    fn test_user_record_serialization_fields() {
        let record = UserRecord {
            id: 42,
            email: "reader@example.com".to_string(),
            role: Role::Basic,
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            address: "No address".to_string(),
            phone: "01234567890".to_string(),
            username: "jdoe".to_string(),
            orders: vec![1, 2, 3],
            telegram_id: 0,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], 42);
        assert_eq!(value["role"], "basic");
        assert_eq!(value["orders"], serde_json::json!([1, 2, 3]));
        assert!(value.get("created_at").is_none());
    }
}
