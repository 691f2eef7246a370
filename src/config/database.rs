//! Database connection pool initialization.
//!
//! Reads `DATABASE_URL` and connects a SQLx PostgreSQL pool, then applies any
//! pending migrations from `./migrations`.
//!
//! # Panics
//!
//! Panics if `DATABASE_URL` is not set, the connection fails, or a migration
//! cannot be applied; there is no point continuing without a working store.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::env;

pub async fn init_db_pool() -> PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    pool
}
