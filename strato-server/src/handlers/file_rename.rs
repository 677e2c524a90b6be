//! FileRename handler

use std::fs;
use std::io;

use tokio::io::AsyncWrite;

use strato_common::protocol::ServerMessage;
use strato_common::validators::validate_file_path;
use strato_common::{ErrorCode, ErrorInfo};

use crate::constants::{ERR_PATH_INVALID, ERR_RENAME_DESTINATION_EXISTS, ERR_ROOT_PROTECTED};
use crate::files::{ensure_user_area, resolve_new_path, resolve_path, virtual_to_relative};
use crate::handlers::{HandlerContext, authorize, path_error_info};

/// Handle a FileRename message
///
/// Renames or moves within the caller's root. The destination must not
/// exist; on any failure both source and destination are left untouched.
pub async fn handle<W>(
    ctx: &mut HandlerContext<'_, W>,
    token: &str,
    path: &str,
    new_path: &str,
) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let session = match authorize(ctx.sessions, token) {
        Ok(session) => session,
        Err(error) => return send_failure(ctx, error).await,
    };

    if validate_file_path(path).is_err() || validate_file_path(new_path).is_err() {
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

    let source = match resolve_path(&user_root, virtual_to_relative(path)) {
        Ok(source) => source,
        Err(e) => return send_failure(ctx, path_error_info(e)).await,
    };

    if source == user_root {
        return send_failure(
            ctx,
            ErrorInfo::new(ErrorCode::PermissionDenied, ERR_ROOT_PROTECTED),
        )
        .await;
    }

    let destination = match resolve_new_path(&user_root, virtual_to_relative(new_path)) {
        Ok(destination) => destination,
        Err(e) => return send_failure(ctx, path_error_info(e)).await,
    };

    // rename() would clobber an existing destination file; refuse instead
    if destination.symlink_metadata().is_ok() {
        return send_failure(
            ctx,
            ErrorInfo::new(ErrorCode::RenameFailed, ERR_RENAME_DESTINATION_EXISTS),
        )
        .await;
    }

    if let Err(e) = fs::rename(&source, &destination) {
        return send_failure(ctx, ErrorInfo::new(ErrorCode::RenameFailed, e.to_string())).await;
    }

    ctx.send_message(ServerMessage::FileRenameResponse {
        success: true,
        error: None,
    })
    .await
}

async fn send_failure<W>(ctx: &mut HandlerContext<'_, W>, error: ErrorInfo) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    ctx.send_message(ServerMessage::FileRenameResponse {
        success: false,
        error: Some(error),
    })
    .await
}
