//! FileDelete handler

use std::io;

use tokio::io::AsyncWrite;

use strato_common::protocol::ServerMessage;
use strato_common::validators::validate_file_path;
use strato_common::{ErrorCode, ErrorInfo};

use crate::constants::{ERR_DIRECTORY_NOT_EMPTY, ERR_PATH_INVALID, ERR_ROOT_PROTECTED};
use crate::files::{ensure_user_area, remove_path, resolve_path, virtual_to_relative};
use crate::handlers::{HandlerContext, authorize, path_error_info};

/// Handle a FileDelete message
///
/// The user's own root cannot be deleted. Non-empty directories require
/// `recursive`.
pub async fn handle<W>(
    ctx: &mut HandlerContext<'_, W>,
    token: &str,
    path: &str,
    recursive: bool,
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

    if resolved == user_root {
        return send_failure(
            ctx,
            ErrorInfo::new(ErrorCode::PermissionDenied, ERR_ROOT_PROTECTED),
        )
        .await;
    }

    if let Err(e) = remove_path(&resolved, recursive) {
        let error = if resolved.is_dir() && !recursive {
            ErrorInfo::new(ErrorCode::UnknownError, ERR_DIRECTORY_NOT_EMPTY)
        } else {
            ErrorInfo::new(ErrorCode::UnknownError, e.to_string())
        };
        return send_failure(ctx, error).await;
    }

    ctx.send_message(ServerMessage::FileDeleteResponse {
        success: true,
        error: None,
    })
    .await
}

async fn send_failure<W>(ctx: &mut HandlerContext<'_, W>, error: ErrorInfo) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    ctx.send_message(ServerMessage::FileDeleteResponse {
        success: false,
        error: Some(error),
    })
    .await
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::files::user_area;
    use crate::handlers::testing::{create_test_context, read_server_message, signup_user};

    async fn expect_response(
        test_ctx: &mut crate::handlers::testing::TestContext,
    ) -> (bool, Option<ErrorInfo>) {
        match read_server_message(test_ctx).await {
            ServerMessage::FileDeleteResponse { success, error } => (success, error),
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_file() {
        let mut test_ctx = create_test_context().await;
        let token = signup_user(&test_ctx, "alice", "password123").await;

        let area = user_area(test_ctx.file_root, "alice");
        fs::write(area.join("notes.txt"), "x").unwrap();

        let mut ctx = test_ctx.handler_context();
        handle(&mut ctx, &token, "/notes.txt", false).await.unwrap();

        let (success, error) = expect_response(&mut test_ctx).await;
        assert!(success);
        assert!(error.is_none());
        assert!(!area.join("notes.txt").exists());
    }

    #[tokio::test]
    async fn test_delete_empty_directory() {
        let mut test_ctx = create_test_context().await;
        let token = signup_user(&test_ctx, "alice", "password123").await;

        let area = user_area(test_ctx.file_root, "alice");
        fs::create_dir(area.join("docs")).unwrap();

        let mut ctx = test_ctx.handler_context();
        handle(&mut ctx, &token, "/docs", false).await.unwrap();

        let (success, _) = expect_response(&mut test_ctx).await;
        assert!(success);
        assert!(!area.join("docs").exists());
    }

    #[tokio::test]
    async fn test_delete_nonempty_directory_requires_recursive() {
        let mut test_ctx = create_test_context().await;
        let token = signup_user(&test_ctx, "alice", "password123").await;

        let area = user_area(test_ctx.file_root, "alice");
        fs::create_dir(area.join("docs")).unwrap();
        fs::write(area.join("docs/inner.txt"), "x").unwrap();

        let mut ctx = test_ctx.handler_context();
        handle(&mut ctx, &token, "/docs", false).await.unwrap();

        let (success, error) = expect_response(&mut test_ctx).await;
        assert!(!success);
        assert_eq!(error.unwrap().error_code(), Some(ErrorCode::UnknownError));
        assert!(area.join("docs/inner.txt").exists());

        let mut ctx = test_ctx.handler_context();
        handle(&mut ctx, &token, "/docs", true).await.unwrap();

        let (success, _) = expect_response(&mut test_ctx).await;
        assert!(success);
        assert!(!area.join("docs").exists());
    }

    #[tokio::test]
    async fn test_delete_missing_path() {
        let mut test_ctx = create_test_context().await;
        let token = signup_user(&test_ctx, "alice", "password123").await;

        let mut ctx = test_ctx.handler_context();
        handle(&mut ctx, &token, "/nope.txt", false).await.unwrap();

        let (success, error) = expect_response(&mut test_ctx).await;
        assert!(!success);
        assert_eq!(error.unwrap().error_code(), Some(ErrorCode::FileNotFound));
    }

    #[tokio::test]
    async fn test_delete_root_is_protected() {
        let mut test_ctx = create_test_context().await;
        let token = signup_user(&test_ctx, "alice", "password123").await;

        let mut ctx = test_ctx.handler_context();
        handle(&mut ctx, &token, "/", true).await.unwrap();

        let (success, error) = expect_response(&mut test_ctx).await;
        assert!(!success);
        assert_eq!(
            error.unwrap().error_code(),
            Some(ErrorCode::PermissionDenied)
        );
        assert!(user_area(test_ctx.file_root, "alice").is_dir());
    }
}
