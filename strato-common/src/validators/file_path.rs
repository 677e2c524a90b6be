//! File path validation
//!
//! Validates virtual file paths sent by clients.

/// Maximum length for file paths in characters
pub const MAX_FILE_PATH_LENGTH: usize = 1024;

/// Validation error for file paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilePathError {
    /// Path is empty
    Empty,
    /// Path exceeds maximum length
    TooLong,
    /// Path contains null bytes
    ContainsNull,
    /// Path contains invalid characters (control characters)
    InvalidCharacters,
}

/// Validate a file path from the client
///
/// Checks:
/// - Not empty
/// - Does not exceed maximum length (1024 characters)
/// - No null bytes
/// - No control characters
///
/// Note: This validator does NOT check for path traversal (../) as that
/// is handled by the server's `resolve_path()` function which canonicalizes
/// and verifies the path is within the caller's root.
///
/// # Errors
///
/// Returns a `FilePathError` variant describing the validation failure.
pub fn validate_file_path(path: &str) -> Result<(), FilePathError> {
    if path.is_empty() {
        return Err(FilePathError::Empty);
    }
    if path.len() > MAX_FILE_PATH_LENGTH {
        return Err(FilePathError::TooLong);
    }

    for ch in path.chars() {
        if ch == '\0' {
            return Err(FilePathError::ContainsNull);
        }
        if ch.is_control() {
            return Err(FilePathError::InvalidCharacters);
        }
    }

    Ok(())
}
