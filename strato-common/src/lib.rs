//! Strato Common Library
//!
//! Shared types, wire protocol, and validators for the Strato personal cloud.

mod error_code;
pub mod framing;
pub mod io;
pub mod protocol;
pub mod validators;

pub use error_code::{
    ERROR_CODE_FILE_NOT_FOUND, ERROR_CODE_INVALID_CREDENTIALS, ERROR_CODE_PERMISSION_DENIED,
    ERROR_CODE_RENAME_FAILED, ERROR_CODE_UNKNOWN_ERROR, ERROR_CODE_USER_EXISTS, ErrorCode,
    ErrorInfo,
};

/// Default port for Strato server connections
pub const DEFAULT_PORT: u16 = 7810;

/// Default lifetime of a bearer token in seconds
pub const DEFAULT_SESSION_TTL_SECS: u64 = 3600;

/// Default client-side timeout for a single request in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Maximum size of a single file's content in bytes (no streaming transfers)
pub const MAX_FILE_CONTENT_SIZE: usize = 1024 * 1024;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_outlives_request_timeout() {
        assert!(DEFAULT_SESSION_TTL_SECS > DEFAULT_REQUEST_TIMEOUT_SECS);
    }
}
