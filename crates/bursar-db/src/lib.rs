//! # Bursar DB
//!
//! Database pool initialization for the Bursar API.
//!
//! This crate provides the PostgreSQL connection pool used throughout the
//! application, built with SQLx.

use std::env;

/// Initializes a PostgreSQL connection pool.
///
/// Reads the database URL from the `DATABASE_URL` environment variable and
/// creates a pool that can be cloned and shared across async tasks. Call
/// once during application startup.
///
/// # Panics
///
/// Panics if:
/// - `DATABASE_URL` environment variable is not set
/// - Connection to the database fails
pub async fn init_db_pool() -> sqlx::PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    sqlx::PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database")
}

// Re-export PgPool for convenience
pub use sqlx::PgPool;
