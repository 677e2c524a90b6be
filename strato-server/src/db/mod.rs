//! Database layer
//!
//! SQLite-backed persistent storage for user accounts.

mod password;
mod sql;
mod users;

pub use password::{PasswordError, hash_password, verify_password};
pub use users::{CreateUserError, User, Users};

use std::io;
use std::path::{Path, PathBuf};

use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;

/// Database interface grouping all repositories
///
/// `SqlitePool` uses `Arc` internally, so cloning is cheap.
#[derive(Clone)]
pub struct Database {
    pub users: Users,
}

impl Database {
    /// Create a new database interface from a connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            users: Users::new(pool),
        }
    }
}

/// Get the platform default database path
///
/// # Errors
///
/// Returns an error if the platform data directory cannot be determined.
pub fn default_database_path() -> io::Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| io::Error::other("could not determine platform data directory"))?;
    Ok(data_dir.join("stratod").join("strato.db"))
}

/// Initialize the database: create the file if needed and run migrations
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created, the pool
/// cannot be opened, or migrations fail.
pub async fn init_db(path: &Path) -> io::Result<SqlitePool> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    let pool = SqlitePool::connect_with(options)
        .await
        .map_err(|e| io::Error::other(e.to_string()))?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| io::Error::other(e.to_string()))?;

    Ok(pool)
}
