//! Database connection pool and migration management.
//!
//! This module provides utilities for:
//! - Creating and managing the SQLite connection pool backing the library
//! - Running database migrations automatically

use std::{str::FromStr, time::Duration};

use sqlx::{
    Pool, Sqlite, Transaction,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

/// How long a connection waits on a locked database before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(10);

/// Type alias for the SQLite connection pool.
///
/// Instead of writing `Pool<Sqlite>` everywhere, we can use `DbPool`.
pub type DbPool = Pool<Sqlite>;

pub type DbTransaction = Transaction<'static, Sqlite>;

/// Create a new SQLite connection pool.
///
/// The database file is created if it does not exist yet, and foreign key
/// enforcement is switched on for every connection so link rows cascade with
/// their games, tags, platforms and friends.
///
/// # Errors
///
/// Returns an error if:
/// - The connection string is invalid
/// - The database file cannot be opened or created
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(BUSY_TIMEOUT);

    SqlitePoolOptions::new()
        // Limit concurrent connections
        .max_connections(5)
        .connect_with(options)
        .await
}

/// Begin a transaction that takes the write lock immediately.
///
/// A deferred transaction that reads and then writes cannot upgrade its lock
/// while another connection holds a read lock, and SQLite fails it with
/// `SQLITE_BUSY` instead of waiting. Every read-then-write transaction goes
/// through here so concurrent writers queue on `busy_timeout` instead.
pub async fn begin_write(pool: &DbPool) -> Result<DbTransaction, sqlx::Error> {
    pool.begin_with("BEGIN IMMEDIATE").await
}

/// Run database migrations from the `migrations/` directory.
///
/// Migrations are tracked in the `_sqlx_migrations` table, so each migration runs only once.
///
/// # Errors
///
/// Returns an error if a migration fails to apply.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    // The macro reads migrations at compile time from ./migrations directory
    sqlx::migrate!("./migrations").run(pool).await
}

/// Fresh in-memory database with the schema applied.
///
/// A single connection is used because every `:memory:` connection is its own database.
#[cfg(test)]
pub async fn test_pool() -> DbPool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();

    run_migrations(&pool).await.unwrap();
    pool
}
