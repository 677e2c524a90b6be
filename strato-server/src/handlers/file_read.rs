//! FileRead handler

use std::fs;
use std::io;

use tokio::io::AsyncWrite;

use strato_common::MAX_FILE_CONTENT_SIZE;
use strato_common::protocol::ServerMessage;
use strato_common::validators::validate_file_path;
use strato_common::{ErrorCode, ErrorInfo};

use crate::constants::{ERR_FILE_TOO_LARGE, ERR_NOT_A_FILE, ERR_NOT_TEXT, ERR_PATH_INVALID};
use crate::files::{ensure_user_area, resolve_path, virtual_to_relative};
use crate::handlers::{HandlerContext, authorize, path_error_info};

/// Handle a FileRead message
///
/// Only UTF-8 files up to `MAX_FILE_CONTENT_SIZE` can be read; anything else
/// fails without transferring content.
pub async fn handle<W>(ctx: &mut HandlerContext<'_, W>, token: &str, path: &str) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let session = match authorize(ctx.sessions, token) {
        Ok(session) => session,
        Err(error) => return send_failure(ctx, error).await,
    };

    if validate_file_path(path).is_err() {
        return send_failure(
            ctx,
            ErrorInfo::new(ErrorCode::PermissionDenied, ERR_PATH_INVALID),
        )
        .await;
    }

    let user_root = match ensure_user_area(ctx.file_root, &session.username) {
        Ok(root) => root,
        Err(e) => {
            return send_failure(ctx, ErrorInfo::new(ErrorCode::UnknownError, e.to_string()))
                .await;
        }
    };

    let resolved = match resolve_path(&user_root, virtual_to_relative(path)) {
        Ok(resolved) => resolved,
        Err(e) => return send_failure(ctx, path_error_info(e)).await,
    };

    if !resolved.is_file() {
        return send_failure(ctx, ErrorInfo::new(ErrorCode::FileNotFound, ERR_NOT_A_FILE)).await;
    }

    // Check the size before reading so a huge file never lands in memory
    match fs::metadata(&resolved) {
        Ok(metadata) if metadata.len() > MAX_FILE_CONTENT_SIZE as u64 => {
            return send_failure(
                ctx,
                ErrorInfo::new(ErrorCode::UnknownError, ERR_FILE_TOO_LARGE),
            )
            .await;
        }
        Ok(_) => {}
        Err(e) => {
            return send_failure(ctx, ErrorInfo::new(ErrorCode::UnknownError, e.to_string()))
                .await;
        }
    }

    let content = match fs::read_to_string(&resolved) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::InvalidData => {
            return send_failure(ctx, ErrorInfo::new(ErrorCode::UnknownError, ERR_NOT_TEXT))
                .await;
        }
        Err(e) => {
            return send_failure(ctx, ErrorInfo::new(ErrorCode::UnknownError, e.to_string()))
                .await;
        }
    };

    ctx.send_message(ServerMessage::FileReadResponse {
        success: true,
        content: Some(content),
        error: None,
    })
    .await
}

async fn send_failure<W>(ctx: &mut HandlerContext<'_, W>, error: ErrorInfo) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    ctx.send_message(ServerMessage::FileReadResponse {
        success: false,
        content: None,
        error: Some(error),
    })
    .await
}
