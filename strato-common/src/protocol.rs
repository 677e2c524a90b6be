//! Protocol messages exchanged between client and server
//!
//! Messages are internally tagged JSON (`"type"` field matches the frame's
//! message type string). Every server response carries a `success` flag and,
//! on failure, an `{code, message}` error envelope.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error_code::ErrorInfo;

/// A single entry in a directory listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// File or directory name (no path separators)
    pub name: String,
    /// Entry kind
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Size in bytes (files only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// Kind of a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// Messages sent from client to server
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Register a new account and receive a bearer token
    Signup { username: String, password: String },
    /// Authenticate and receive a bearer token
    Login { username: String, password: String },
    /// List the direct children of a directory
    FileList { token: String, path: String },
    /// Read a file's full text content
    FileRead { token: String, path: String },
    /// Create or overwrite a file with the given content
    FileWrite {
        token: String,
        path: String,
        content: String,
    },
    /// Remove a file or directory
    ///
    /// Directories are only removed when empty unless `recursive` is set.
    FileDelete {
        token: String,
        path: String,
        #[serde(default)]
        recursive: bool,
    },
    /// Create a directory (parent must exist)
    FileCreateDir { token: String, path: String },
    /// Rename/move within the caller's root; fails if the destination exists
    FileRename {
        token: String,
        path: String,
        new_path: String,
    },
}

// Manual Debug so credentials never end up in logs.
impl fmt::Debug for ClientMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signup { username, .. } => f
                .debug_struct("Signup")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::Login { username, .. } => f
                .debug_struct("Login")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::FileList { path, .. } => {
                f.debug_struct("FileList").field("path", path).finish()
            }
            Self::FileRead { path, .. } => {
                f.debug_struct("FileRead").field("path", path).finish()
            }
            Self::FileWrite { path, content, .. } => f
                .debug_struct("FileWrite")
                .field("path", path)
                .field("content_len", &content.len())
                .finish(),
            Self::FileDelete {
                path, recursive, ..
            } => f
                .debug_struct("FileDelete")
                .field("path", path)
                .field("recursive", recursive)
                .finish(),
            Self::FileCreateDir { path, .. } => {
                f.debug_struct("FileCreateDir").field("path", path).finish()
            }
            Self::FileRename { path, new_path, .. } => f
                .debug_struct("FileRename")
                .field("path", path)
                .field("new_path", new_path)
                .finish(),
        }
    }
}

/// Messages sent from server to client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    SignupResponse {
        success: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        token: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<ErrorInfo>,
    },
    LoginResponse {
        success: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        token: Option<String>,
        /// Token lifetime in seconds
        #[serde(skip_serializing_if = "Option::is_none")]
        expires_in: Option<u64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<ErrorInfo>,
    },
    FileListResponse {
        success: bool,
        /// The listed path, echoed back
        #[serde(skip_serializing_if = "Option::is_none")]
        path: Option<String>,
        /// Directory entries, serialized as `files` on the wire
        #[serde(rename = "files", skip_serializing_if = "Option::is_none")]
        entries: Option<Vec<FileEntry>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<ErrorInfo>,
    },
    FileReadResponse {
        success: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<ErrorInfo>,
    },
    FileWriteResponse {
        success: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<ErrorInfo>,
    },
    FileDeleteResponse {
        success: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<ErrorInfo>,
    },
    FileCreateDirResponse {
        success: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<ErrorInfo>,
    },
    FileRenameResponse {
        success: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<ErrorInfo>,
    },
    /// Protocol-level failure (malformed frame); the server disconnects after
    /// sending this.
    Error { message: String },
}
