//! Persistence seam for the user resource.
//!
//! Handlers and services talk to [`UserStore`] instead of a concrete pool so
//! the HTTP surface can be driven end-to-end without PostgreSQL. The real
//! implementation is [`PgUserStore`]; the test suites use
//! [`memory::MemoryUserStore`] behind the `test-utils` feature.

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use super::model::{Role, User};

/// Store failure. Clients only ever see this as an internal error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Column updates applied by [`UserStore::update`]. `None` leaves the column
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub role: Option<Role>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub username: Option<String>,
    pub telegram_id: Option<i64>,
}

/// Single-user persistence operations. Each call maps to one atomic statement.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;

    /// Exact match on both columns at once; used by token resolution.
    async fn find_by_email_and_id(&self, email: &str, id: i64)
    -> Result<Option<User>, StoreError>;

    /// Whether a user other than `exclude_id` already holds `phone`.
    async fn phone_taken(&self, phone: &str, exclude_id: i64) -> Result<bool, StoreError>;

    /// Ids of the user's book orders, ascending.
    async fn order_ids(&self, user_id: i64) -> Result<Vec<i64>, StoreError>;

    /// Applies `changes` and returns the updated row, or `None` if the user
    /// does not exist.
    async fn update(&self, id: i64, changes: &UserChanges) -> Result<Option<User>, StoreError>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}

const USER_COLUMNS: &str = "id, username, email, role, first_name, last_name, address, phone, \
                            telegram_id, created_at, updated_at";

/// PostgreSQL-backed [`UserStore`].
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email_and_id(
        &self,
        email: &str,
        id: i64,
    ) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1 AND id = $2"
        ))
        .bind(email)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn phone_taken(&self, phone: &str, exclude_id: i64) -> Result<bool, StoreError> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE phone = $1 AND id <> $2)",
        )
        .bind(phone)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    async fn order_ids(&self, user_id: i64) -> Result<Vec<i64>, StoreError> {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM orders WHERE user_id = $1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    async fn update(&self, id: i64, changes: &UserChanges) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET
                email = COALESCE($2, email),
                role = COALESCE($3, role),
                first_name = COALESCE($4, first_name),
                last_name = COALESCE($5, last_name),
                address = COALESCE($6, address),
                phone = COALESCE($7, phone),
                username = COALESCE($8, username),
                telegram_id = COALESCE($9, telegram_id),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.email.as_deref())
        .bind(changes.role)
        .bind(changes.first_name.as_deref())
        .bind(changes.last_name.as_deref())
        .bind(changes.address.as_deref())
        .bind(changes.phone.as_deref())
        .bind(changes.username.as_deref())
        .bind(changes.telegram_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod memory {
    //! In-memory [`UserStore`] used by the test suites.

    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::{StoreError, UserChanges, UserStore};
    use crate::modules::users::model::User;

    #[derive(Debug, Default)]
    pub struct MemoryUserStore {
        inner: Mutex<Inner>,
    }

    #[derive(Debug, Default)]
    struct Inner {
        users: BTreeMap<i64, User>,
        orders: BTreeMap<i64, Vec<i64>>,
    }

    impl MemoryUserStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn seed_user(&self, user: User) {
            self.inner.lock().unwrap().users.insert(user.id, user);
        }

        pub fn seed_orders(&self, user_id: i64, mut order_ids: Vec<i64>) {
            order_ids.sort_unstable();
            self.inner.lock().unwrap().orders.insert(user_id, order_ids);
        }
    }

    #[async_trait]
    impl UserStore for MemoryUserStore {
        async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
            Ok(self.inner.lock().unwrap().users.get(&id).cloned())
        }

        async fn find_by_email_and_id(
            &self,
            email: &str,
            id: i64,
        ) -> Result<Option<User>, StoreError> {
            Ok(self
                .inner
                .lock()
                .unwrap()
                .users
                .get(&id)
                .filter(|user| user.email == email)
                .cloned())
        }

        async fn phone_taken(&self, phone: &str, exclude_id: i64) -> Result<bool, StoreError> {
            Ok(self
                .inner
                .lock()
                .unwrap()
                .users
                .values()
                .any(|user| user.id != exclude_id && user.phone == phone))
        }

        async fn order_ids(&self, user_id: i64) -> Result<Vec<i64>, StoreError> {
            Ok(self
                .inner
                .lock()
                .unwrap()
                .orders
                .get(&user_id)
                .cloned()
                .unwrap_or_default())
        }

        async fn update(
            &self,
            id: i64,
            changes: &UserChanges,
        ) -> Result<Option<User>, StoreError> {
            let mut inner = self.inner.lock().unwrap();
            let Some(user) = inner.users.get_mut(&id) else {
                return Ok(None);
            };

            if let Some(email) = &changes.email {
                user.email = email.clone();
            }
            if let Some(role) = changes.role {
                user.role = role;
            }
            if let Some(first_name) = &changes.first_name {
                user.first_name = first_name.clone();
            }
            if let Some(last_name) = &changes.last_name {
                user.last_name = last_name.clone();
            }
            if let Some(address) = &changes.address {
                user.address = address.clone();
            }
            if let Some(phone) = &changes.phone {
                user.phone = phone.clone();
            }
            if let Some(username) = &changes.username {
                user.username = username.clone();
            }
            if let Some(telegram_id) = changes.telegram_id {
                user.telegram_id = telegram_id;
            }
            user.updated_at = chrono::Utc::now();

            Ok(Some(user.clone()))
        }

        async fn delete(&self, id: i64) -> Result<bool, StoreError> {
            let mut inner = self.inner.lock().unwrap();
            inner.orders.remove(&id);
            Ok(inner.users.remove(&id).is_some())
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryUserStore;
