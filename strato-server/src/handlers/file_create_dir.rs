//! FileCreateDir handler

use std::fs;
use std::io;

use tokio::io::AsyncWrite;

use strato_common::protocol::ServerMessage;
use strato_common::validators::validate_file_path;
use strato_common::{ErrorCode, ErrorInfo};

use crate::constants::{ERR_ALREADY_EXISTS, ERR_PATH_INVALID};
use crate::files::{ensure_user_area, resolve_new_path, virtual_to_relative};
use crate::handlers::{HandlerContext, authorize, path_error_info};

/// Handle a FileCreateDir message
///
/// Creates a single directory; the parent must already exist.
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

    let resolved = match resolve_new_path(&user_root, virtual_to_relative(path)) {
        Ok(resolved) => resolved,
        Err(e) => return send_failure(ctx, path_error_info(e)).await,
    };

    if resolved.exists() {
        return send_failure(
            ctx,
            ErrorInfo::new(ErrorCode::UnknownError, ERR_ALREADY_EXISTS),
        )
        .await;
    }

    if let Err(e) = fs::create_dir(&resolved) {
        return send_failure(ctx, ErrorInfo::new(ErrorCode::UnknownError, e.to_string())).await;
    }

    ctx.send_message(ServerMessage::FileCreateDirResponse {
        success: true,
        error: None,
    })
    .await
}

async fn send_failure<W>(ctx: &mut HandlerContext<'_, W>, error: ErrorInfo) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    ctx.send_message(ServerMessage::FileCreateDirResponse {
        success: false,
        error: Some(error),
    })
    .await
}
