//! Machine-readable error codes for the RPC surface
//!
//! Every failed operation returns an `{code, message}` envelope. The code is
//! a stable string clients can branch on; the message is human-readable
//! diagnostics only.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Wire string for [`ErrorCode::PermissionDenied`]
pub const ERROR_CODE_PERMISSION_DENIED: &str = "PERMISSION_DENIED";
/// Wire string for [`ErrorCode::FileNotFound`]
pub const ERROR_CODE_FILE_NOT_FOUND: &str = "FILE_NOT_FOUND";
/// Wire string for [`ErrorCode::RenameFailed`]
pub const ERROR_CODE_RENAME_FAILED: &str = "RENAME_FAILED";
/// Wire string for [`ErrorCode::UserExists`]
pub const ERROR_CODE_USER_EXISTS: &str = "USER_EXISTS";
/// Wire string for [`ErrorCode::InvalidCredentials`]
pub const ERROR_CODE_INVALID_CREDENTIALS: &str = "INVALID_CREDENTIALS";
/// Wire string for [`ErrorCode::UnknownError`]
pub const ERROR_CODE_UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";

/// Error codes returned in response envelopes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Missing/invalid/expired token, or a path that escapes the caller's
    /// private root. Escape attempts deliberately use this code rather than
    /// `FileNotFound` so they never leak which outside paths exist.
    PermissionDenied,

    /// The target file or directory does not exist within the caller's root
    FileNotFound,

    /// Rename/move could not be performed (e.g., destination already exists)
    RenameFailed,

    /// Signup for a username that is already registered
    UserExists,

    /// Login with an unknown username or wrong password
    ///
    /// The two cases are indistinguishable by design.
    InvalidCredentials,

    /// Any other failure; the message carries the underlying diagnostics
    UnknownError,
}

impl ErrorCode {
    /// Convert to the string representation used in protocol messages
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PermissionDenied => ERROR_CODE_PERMISSION_DENIED,
            Self::FileNotFound => ERROR_CODE_FILE_NOT_FOUND,
            Self::RenameFailed => ERROR_CODE_RENAME_FAILED,
            Self::UserExists => ERROR_CODE_USER_EXISTS,
            Self::InvalidCredentials => ERROR_CODE_INVALID_CREDENTIALS,
            Self::UnknownError => ERROR_CODE_UNKNOWN_ERROR,
        }
    }

    /// Parse from string (for client-side handling)
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            ERROR_CODE_PERMISSION_DENIED => Some(Self::PermissionDenied),
            ERROR_CODE_FILE_NOT_FOUND => Some(Self::FileNotFound),
            ERROR_CODE_RENAME_FAILED => Some(Self::RenameFailed),
            ERROR_CODE_USER_EXISTS => Some(Self::UserExists),
            ERROR_CODE_INVALID_CREDENTIALS => Some(Self::InvalidCredentials),
            ERROR_CODE_UNKNOWN_ERROR => Some(Self::UnknownError),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ErrorCode> for String {
    fn from(code: ErrorCode) -> Self {
        code.as_str().to_string()
    }
}

/// Typed failure envelope carried in every response message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// One of the `ERROR_CODE_*` strings
    pub code: String,
    /// Human-readable diagnostics
    pub message: String,
}

impl ErrorInfo {
    /// Create an error envelope from a typed code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.as_str().to_string(),
            message: message.into(),
        }
    }

    /// Parse the code back into its typed form
    ///
    /// Returns `None` for codes this client version does not know.
    #[must_use]
    pub fn error_code(&self) -> Option<ErrorCode> {
        ErrorCode::parse(&self.code)
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}
