//! User account database operations

use std::fmt;
use std::io;

use sqlx::SqlitePool;

use super::sql::{SQL_DELETE_USER, SQL_INSERT_USER, SQL_SELECT_USER_BY_USERNAME};

/// A user account row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub created_at: i64,
}

/// Error type for user creation
#[derive(Debug)]
pub enum CreateUserError {
    /// The username is already taken
    AlreadyExists,
    /// Underlying database failure
    Database(String),
}

impl fmt::Display for CreateUserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyExists => write!(f, "username already exists"),
            Self::Database(e) => write!(f, "database error: {}", e),
        }
    }
}

impl std::error::Error for CreateUserError {}

/// Database interface for user accounts
#[derive(Clone)]
pub struct Users {
    pool: SqlitePool,
}

impl Users {
    /// Create a new Users instance
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user account
    ///
    /// Uniqueness is enforced by the UNIQUE constraint on the username
    /// column, so concurrent signups for the same name cannot both succeed.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if the username is taken, or `Database` for
    /// any other failure.
    pub async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        created_at: i64,
    ) -> Result<User, CreateUserError> {
        let result = sqlx::query(SQL_INSERT_USER)
            .bind(username)
            .bind(password_hash)
            .bind(created_at)
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) => Ok(User {
                id: done.last_insert_rowid(),
                username: username.to_string(),
                password_hash: password_hash.to_string(),
                created_at,
            }),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(CreateUserError::AlreadyExists)
            }
            Err(e) => Err(CreateUserError::Database(e.to_string())),
        }
    }

    /// Look up a user by username (case-sensitive)
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn get_user_by_username(&self, username: &str) -> io::Result<Option<User>> {
        sqlx::query_as::<_, User>(SQL_SELECT_USER_BY_USERNAME)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| io::Error::other(e.to_string()))
    }

    /// Delete a user by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn delete_user(&self, user_id: i64) -> io::Result<()> {
        sqlx::query(SQL_DELETE_USER)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| io::Error::other(e.to_string()))?;
        Ok(())
    }
}
