//! Per-type payload limits for protocol messages

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::MAX_FILE_CONTENT_SIZE;
use crate::validators::{MAX_FILE_PATH_LENGTH, MAX_PASSWORD_LENGTH, MAX_USERNAME_LENGTH};

/// Worst-case JSON string escaping factor (a control character escapes to six bytes)
const JSON_ESCAPE_FACTOR: u64 = 6;

/// Maximum escaped size of a file's content inside a JSON payload
const ESCAPED_CONTENT_SIZE: u64 = MAX_FILE_CONTENT_SIZE as u64 * JSON_ESCAPE_FACTOR;

/// Maximum escaped sizes of the bounded string fields. Every field is budgeted
/// at the full escape factor; passwords may be all control characters, and
/// paths may be all quotes or backslashes.
const ESCAPED_USERNAME_SIZE: u64 = MAX_USERNAME_LENGTH as u64 * JSON_ESCAPE_FACTOR;
const ESCAPED_PASSWORD_SIZE: u64 = MAX_PASSWORD_LENGTH as u64 * JSON_ESCAPE_FACTOR;
const ESCAPED_PATH_SIZE: u64 = MAX_FILE_PATH_LENGTH as u64 * JSON_ESCAPE_FACTOR;

/// Structural overhead for a client message: braces, field names, quoting,
/// the token (32 hex, never escaped), and a bool flag
const CLIENT_ENVELOPE_BASE: u64 = 200;

/// Base overhead for a response envelope: success flag plus an error object
/// whose message may carry an OS diagnostic (capped at 2048 chars)
const RESPONSE_ENVELOPE_BASE: u64 = 2200;

/// Apply 20% padding to a limit for safety margin
const fn pad_limit(base: u64) -> u64 {
    // Integer math: multiply by 6 and divide by 5 equals 1.2x
    (base * 6) / 5
}

/// Maximum payload sizes for each message type
///
/// These limits are enforced after parsing the frame header but before reading
/// the payload, allowing early rejection of oversized messages.
///
/// Base limits match the maximum possible serialized JSON size based on
/// validator constraints (username 32, password 128, path 1024, token 32,
/// content 1 MiB), with every bounded string budgeted at its worst-case
/// escaped size, then 20% padding is added for safety margin. Anything the
/// validators accept must fit; the frame layer never rejects a message that
/// the handlers would.
///
/// A limit of `0` means "unlimited" (no per-type limit). This is used only for
/// `FileListResponse`, where the entry count is bounded by the directory
/// contents and the client has already chosen to trust the server.
static MESSAGE_TYPE_LIMITS: LazyLock<HashMap<&'static str, u64>> = LazyLock::new(|| {
    let mut m = HashMap::new();

    // Client messages
    let credentials = ESCAPED_USERNAME_SIZE + ESCAPED_PASSWORD_SIZE + CLIENT_ENVELOPE_BASE;
    let single_path = ESCAPED_PATH_SIZE + CLIENT_ENVELOPE_BASE;
    m.insert("Signup", pad_limit(credentials));
    m.insert("Login", pad_limit(credentials));
    m.insert("FileList", pad_limit(single_path));
    m.insert("FileRead", pad_limit(single_path));
    m.insert("FileWrite", pad_limit(ESCAPED_CONTENT_SIZE + single_path));
    m.insert("FileDelete", pad_limit(single_path)); // recursive bool fits the envelope
    m.insert("FileCreateDir", pad_limit(single_path));
    m.insert(
        "FileRename",
        pad_limit(2 * ESCAPED_PATH_SIZE + CLIENT_ENVELOPE_BASE),
    );

    // Server messages
    m.insert("SignupResponse", pad_limit(RESPONSE_ENVELOPE_BASE + 40)); // + token (32)
    m.insert("LoginResponse", pad_limit(RESPONSE_ENVELOPE_BASE + 70)); // + token + expires_in
    m.insert("FileListResponse", 0); // unlimited (server-trusted, entry count unbounded)
    m.insert(
        "FileReadResponse",
        pad_limit(ESCAPED_CONTENT_SIZE + RESPONSE_ENVELOPE_BASE),
    );
    m.insert("FileWriteResponse", pad_limit(RESPONSE_ENVELOPE_BASE));
    m.insert("FileDeleteResponse", pad_limit(RESPONSE_ENVELOPE_BASE));
    m.insert("FileCreateDirResponse", pad_limit(RESPONSE_ENVELOPE_BASE));
    m.insert("FileRenameResponse", pad_limit(RESPONSE_ENVELOPE_BASE));
    m.insert("Error", pad_limit(RESPONSE_ENVELOPE_BASE));

    m
});

/// Check whether a message type is part of the protocol
#[must_use]
pub fn is_known_message_type(message_type: &str) -> bool {
    MESSAGE_TYPE_LIMITS.contains_key(message_type)
}

/// Maximum payload size for a message type (`0` = unlimited)
///
/// Unknown types return `0`; the reader rejects unknown types before
/// consulting the limit.
#[must_use]
pub fn max_payload_for_type(message_type: &str) -> u64 {
    MESSAGE_TYPE_LIMITS
        .get(message_type)
        .copied()
        .unwrap_or(0)
}
