//! Input validation functions
//!
//! Reusable validators for common input types. These validators are shared
//! between client and server - clients can use them for pre-validation,
//! servers use them for enforcement.

mod file_path;
mod password;
mod token;
mod username;

pub use file_path::{FilePathError, MAX_FILE_PATH_LENGTH, validate_file_path};
pub use password::{MAX_PASSWORD_LENGTH, PasswordError, validate_password};
pub use token::{TOKEN_HEX_LENGTH, TokenError, validate_token};
pub use username::{MAX_USERNAME_LENGTH, UsernameError, validate_username};
