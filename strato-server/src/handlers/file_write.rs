//! FileWrite handler

use std::fs;
use std::io;

use tokio::io::AsyncWrite;

use strato_common::MAX_FILE_CONTENT_SIZE;
use strato_common::protocol::ServerMessage;
use strato_common::validators::validate_file_path;
use strato_common::{ErrorCode, ErrorInfo};

use crate::constants::{ERR_CONTENT_TOO_LARGE, ERR_NOT_A_FILE, ERR_PATH_INVALID};
use crate::files::{
    PathError, ensure_user_area, resolve_new_path, resolve_path, virtual_to_relative,
};
use crate::handlers::{HandlerContext, authorize, path_error_info};

/// Handle a FileWrite message
///
/// Creates the file if missing, overwrites it otherwise. The parent
/// directory must already exist.
pub async fn handle<W>(
    ctx: &mut HandlerContext<'_, W>,
    token: &str,
    path: &str,
    content: &str,
) -> io::Result<()>
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

    if content.len() > MAX_FILE_CONTENT_SIZE {
        return send_failure(
            ctx,
            ErrorInfo::new(ErrorCode::UnknownError, ERR_CONTENT_TOO_LARGE),
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

    let relative = virtual_to_relative(path);

    // Overwrite path for existing files; for new files the parent must exist
    let resolved = match resolve_path(&user_root, relative) {
        Ok(existing) => {
            if existing.is_dir() {
                return send_failure(
                    ctx,
                    ErrorInfo::new(ErrorCode::UnknownError, ERR_NOT_A_FILE),
                )
                .await;
            }
            existing
        }
        Err(PathError::NotFound) => match resolve_new_path(&user_root, relative) {
            Ok(new_path) => new_path,
            Err(e) => return send_failure(ctx, path_error_info(e)).await,
        },
        Err(e) => return send_failure(ctx, path_error_info(e)).await,
    };

    if let Err(e) = fs::write(&resolved, content) {
        return send_failure(ctx, ErrorInfo::new(ErrorCode::UnknownError, e.to_string())).await;
    }

    ctx.send_message(ServerMessage::FileWriteResponse {
        success: true,
        error: None,
    })
    .await
}

async fn send_failure<W>(ctx: &mut HandlerContext<'_, W>, error: ErrorInfo) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    ctx.send_message(ServerMessage::FileWriteResponse {
        success: false,
        error: Some(error),
    })
    .await
}
