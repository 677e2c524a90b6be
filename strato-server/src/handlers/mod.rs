//! Request handlers for client messages
//!
//! Each operation lives in its own module. Handlers receive a
//! `HandlerContext` carrying everything needed to process one message and
//! write the response.

use std::io;
use std::net::SocketAddr;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::io::AsyncWrite;

use strato_common::framing::{FrameWriter, MessageId};
use strato_common::io::send_server_message_with_id;
use strato_common::protocol::ServerMessage;
use strato_common::validators::validate_token;
use strato_common::{ErrorCode, ErrorInfo};

use crate::constants::ERR_INVALID_TOKEN;
use crate::db::Database;
use crate::files::PathError;
use crate::sessions::{Session, SessionManager};

pub mod file_create_dir;
pub mod file_delete;
pub mod file_list;
pub mod file_read;
pub mod file_rename;
pub mod file_write;
pub mod login;
pub mod signup;

#[cfg(test)]
pub mod testing;

/// Context passed to all message handlers
pub struct HandlerContext<'a, W>
where
    W: AsyncWrite + Unpin,
{
    /// Frame writer for sending responses
    pub frame_writer: &'a mut FrameWriter<W>,
    /// Client's socket address (for logging)
    pub peer_addr: SocketAddr,
    /// Database handle
    pub db: &'a Database,
    /// Session token store
    pub sessions: &'a SessionManager,
    /// Canonical root of the file storage area
    pub file_root: &'static Path,
    /// Debug logging enabled
    pub debug: bool,
    /// Message ID of the request being handled (echoed in the response)
    pub message_id: MessageId,
}

impl<W> HandlerContext<'_, W>
where
    W: AsyncWrite + Unpin,
{
    /// Send a response message, echoing the request's message ID
    pub async fn send_message(&mut self, message: ServerMessage) -> io::Result<()> {
        send_server_message_with_id(self.frame_writer, &message, self.message_id).await
    }
}

/// Resolve a bearer token to its session
///
/// Malformed tokens and unknown/expired tokens are deliberately
/// indistinguishable in the returned error.
pub fn authorize(sessions: &SessionManager, token: &str) -> Result<Session, ErrorInfo> {
    if validate_token(token).is_err() {
        return Err(ErrorInfo::new(ErrorCode::PermissionDenied, ERR_INVALID_TOKEN));
    }
    sessions
        .validate(token)
        .ok_or_else(|| ErrorInfo::new(ErrorCode::PermissionDenied, ERR_INVALID_TOKEN))
}

/// Map a path resolution failure to its wire error
///
/// Escape attempts report `PermissionDenied` rather than `FileNotFound` so
/// probing cannot reveal which outside paths exist.
pub fn path_error_info(err: PathError) -> ErrorInfo {
    match err {
        PathError::NotFound => ErrorInfo::new(
            ErrorCode::FileNotFound,
            crate::constants::ERR_FILE_NOT_FOUND,
        ),
        PathError::InvalidPath | PathError::AccessDenied => ErrorInfo::new(
            ErrorCode::PermissionDenied,
            crate::constants::ERR_ACCESS_DENIED,
        ),
        PathError::CanonicalizeFailed(e) => ErrorInfo::new(ErrorCode::UnknownError, e),
        PathError::InvalidAreaRoot => {
            ErrorInfo::new(ErrorCode::UnknownError, "storage root misconfigured")
        }
    }
}

/// Current Unix timestamp in seconds
pub fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
