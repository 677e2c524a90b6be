//! Server message and error string constants

// Startup messages
pub const MSG_BANNER: &str = "Strato Server v";
pub const MSG_DATABASE: &str = "Database: ";
pub const MSG_FILE_ROOT: &str = "File root: ";
pub const MSG_LISTENING: &str = "Listening on ";
pub const MSG_SHUTDOWN_RECEIVED: &str = "Shutdown signal received, stopping server";

// Startup errors
pub const ERR_GENERIC: &str = "Error: ";
pub const ERR_DATABASE_INIT: &str = "Failed to initialize database: ";
pub const ERR_FILE_ROOT_CANONICALIZE: &str = "failed to canonicalize file root: ";
pub const ERR_BIND: &str = "Failed to bind listener: ";
pub const ERR_ACCEPT: &str = "Failed to accept connection: ";
pub const ERR_CONNECTION: &str = "Connection error from ";
pub const ERR_SET_PERMISSIONS: &str = "Failed to set database file permissions: ";
pub const ERR_SIGNAL_SIGTERM: &str = "Failed to install SIGTERM handler";

// Connection errors
pub const ERR_HANDLING_MESSAGE: &str = "Error handling message from ";
pub const ERR_INVALID_MESSAGE_FORMAT: &str = "Invalid message format";

// Handler error messages (sent to clients inside error envelopes)
pub const ERR_INVALID_TOKEN: &str = "Invalid or expired token";
pub const ERR_INVALID_CREDENTIALS: &str = "Invalid username or password";
pub const ERR_USERNAME_INVALID: &str = "Invalid username";
pub const ERR_PASSWORD_INVALID: &str = "Invalid password";
pub const ERR_USER_EXISTS: &str = "Username is already taken";
pub const ERR_FILE_NOT_FOUND: &str = "File or directory not found";
pub const ERR_ACCESS_DENIED: &str = "Access denied";
pub const ERR_PATH_INVALID: &str = "Invalid path";
pub const ERR_NOT_A_DIRECTORY: &str = "Not a directory";
pub const ERR_NOT_A_FILE: &str = "Not a file";
pub const ERR_FILE_TOO_LARGE: &str = "File is too large";
pub const ERR_NOT_TEXT: &str = "File is not valid UTF-8 text";
pub const ERR_CONTENT_TOO_LARGE: &str = "Content is too large";
pub const ERR_ROOT_PROTECTED: &str = "The root directory cannot be modified";
pub const ERR_ALREADY_EXISTS: &str = "A file or directory with that name already exists";
pub const ERR_DIRECTORY_NOT_EMPTY: &str = "Directory is not empty";
pub const ERR_RENAME_DESTINATION_EXISTS: &str = "Destination already exists";
