//! SQL query constants for database operations
//!
//! This module contains all SQL queries used by the database layer.
//! Each query is documented with its parameters and special behaviors.

/// Insert a new user
///
/// **Parameters:**
/// 1. `username: &str` - Account name (unique, case-sensitive)
/// 2. `password_hash: &str` - Argon2id hash in PHC string format
/// 3. `created_at: i64` - Unix timestamp in seconds
///
/// **Note:** Fails with a unique constraint violation if the username is taken.
pub const SQL_INSERT_USER: &str =
    "INSERT INTO users (username, password_hash, created_at) VALUES (?, ?, ?)";

/// Select user by username (case-sensitive lookup)
///
/// **Parameters:**
/// 1. `username: &str` - Username to search for
///
/// **Returns:** `(id, username, password_hash, created_at)`
pub const SQL_SELECT_USER_BY_USERNAME: &str =
    "SELECT id, username, password_hash, created_at FROM users WHERE username = ?";

/// Delete a user by ID
///
/// **Parameters:**
/// 1. `user_id: i64` - User ID to delete
///
/// **Note:** Used to roll back account creation when the user's storage
/// directory cannot be created.
pub const SQL_DELETE_USER: &str = "DELETE FROM users WHERE id = ?";

/// Count all users
///
/// **Parameters:** None
///
/// **Returns:** `(count: i64)`
///
/// Note: Only used in tests.
#[cfg(test)]
pub const SQL_COUNT_USERS: &str = "SELECT COUNT(*) FROM users";
