//! Password validation
//!
//! Validates password strings for signup and login.

/// Maximum length for passwords in bytes
///
/// This limit prevents DoS attacks via Argon2 hashing of extremely long passwords.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Validation error for passwords
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordError {
    /// Password is empty
    Empty,
    /// Password exceeds maximum length
    TooLong,
}

/// Validate a password
///
/// Checks:
/// - Not empty
/// - Does not exceed maximum length (128 bytes)
///
/// Note: We don't check for control characters in passwords since they
/// may be part of a passphrase or generated password.
///
/// # Errors
///
/// Returns a `PasswordError` variant describing the validation failure.
pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    if password.is_empty() {
        return Err(PasswordError::Empty);
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(PasswordError::TooLong);
    }
    Ok(())
}
