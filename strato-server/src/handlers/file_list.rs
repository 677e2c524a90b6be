//! FileList handler

use std::io;

use tokio::io::AsyncWrite;

use strato_common::protocol::ServerMessage;
use strato_common::validators::validate_file_path;
use strato_common::{ErrorCode, ErrorInfo};

use crate::constants::{ERR_NOT_A_DIRECTORY, ERR_PATH_INVALID};
use crate::files::{ensure_user_area, list_directory, resolve_path, virtual_to_relative};
use crate::handlers::{HandlerContext, authorize, path_error_info};

/// Handle a FileList message
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

    if !resolved.is_dir() {
        return send_failure(
            ctx,
            ErrorInfo::new(ErrorCode::FileNotFound, ERR_NOT_A_DIRECTORY),
        )
        .await;
    }

    let entries = match list_directory(&resolved) {
        Ok(entries) => entries,
        Err(e) => {
            return send_failure(ctx, ErrorInfo::new(ErrorCode::UnknownError, e.to_string()))
                .await;
        }
    };

    ctx.send_message(ServerMessage::FileListResponse {
        success: true,
        path: Some(path.to_string()),
        entries: Some(entries),
        error: None,
    })
    .await
}

async fn send_failure<W>(ctx: &mut HandlerContext<'_, W>, error: ErrorInfo) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    ctx.send_message(ServerMessage::FileListResponse {
        success: false,
        path: None,
        entries: None,
        error: Some(error),
    })
    .await
}

#[cfg(test)]
mod tests {
    use std::fs;

    use strato_common::protocol::EntryKind;

    use super::*;
    use crate::files::user_area;
    use crate::handlers::testing::{create_test_context, read_server_message, signup_user};

    #[tokio::test]
    async fn test_list_root() {
        let mut test_ctx = create_test_context().await;
        let token = signup_user(&test_ctx, "alice", "password123").await;

        let area = user_area(test_ctx.file_root, "alice");
        fs::write(area.join("notes.txt"), "hello").unwrap();
        fs::create_dir(area.join("music")).unwrap();

        let mut ctx = test_ctx.handler_context();
        handle(&mut ctx, &token, "/").await.unwrap();

        match read_server_message(&mut test_ctx).await {
            ServerMessage::FileListResponse {
                success,
                path,
                entries,
                error,
            } => {
                assert!(success);
                assert_eq!(path.as_deref(), Some("/"));
                assert!(error.is_none());

                let entries = entries.unwrap();
                assert_eq!(entries.len(), 2);
                // Directories sort first
                assert_eq!(entries[0].name, "music");
                assert_eq!(entries[0].kind, EntryKind::Directory);
                assert_eq!(entries[1].name, "notes.txt");
                assert_eq!(entries[1].size, Some(5));
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_subdirectory() {
        let mut test_ctx = create_test_context().await;
        let token = signup_user(&test_ctx, "alice", "password123").await;

        let area = user_area(test_ctx.file_root, "alice");
        fs::create_dir(area.join("documents")).unwrap();
        fs::write(area.join("documents/a.txt"), "a").unwrap();

        let mut ctx = test_ctx.handler_context();
        handle(&mut ctx, &token, "/documents").await.unwrap();

        match read_server_message(&mut test_ctx).await {
            ServerMessage::FileListResponse {
                success, entries, ..
            } => {
                assert!(success);
                assert_eq!(entries.unwrap()[0].name, "a.txt");
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_missing_directory() {
        let mut test_ctx = create_test_context().await;
        let token = signup_user(&test_ctx, "alice", "password123").await;

        let mut ctx = test_ctx.handler_context();
        handle(&mut ctx, &token, "/nope").await.unwrap();

        match read_server_message(&mut test_ctx).await {
            ServerMessage::FileListResponse { success, error, .. } => {
                assert!(!success);
                assert_eq!(error.unwrap().error_code(), Some(ErrorCode::FileNotFound));
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_file_is_not_a_directory() {
        let mut test_ctx = create_test_context().await;
        let token = signup_user(&test_ctx, "alice", "password123").await;

        let area = user_area(test_ctx.file_root, "alice");
        fs::write(area.join("notes.txt"), "hello").unwrap();

        let mut ctx = test_ctx.handler_context();
        handle(&mut ctx, &token, "/notes.txt").await.unwrap();

        match read_server_message(&mut test_ctx).await {
            ServerMessage::FileListResponse { success, error, .. } => {
                assert!(!success);
                assert_eq!(error.unwrap().error_code(), Some(ErrorCode::FileNotFound));
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_rejects_bad_token() {
        let mut test_ctx = create_test_context().await;
        signup_user(&test_ctx, "alice", "password123").await;

        let mut ctx = test_ctx.handler_context();
        handle(&mut ctx, "ffeeddccbbaa99887766554433221100", "/")
            .await
            .unwrap();

        match read_server_message(&mut test_ctx).await {
            ServerMessage::FileListResponse { success, error, .. } => {
                assert!(!success);
                assert_eq!(
                    error.unwrap().error_code(),
                    Some(ErrorCode::PermissionDenied)
                );
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_rejects_traversal() {
        let mut test_ctx = create_test_context().await;
        let token = signup_user(&test_ctx, "alice", "password123").await;
        signup_user(&test_ctx, "bob", "password123").await;

        let mut ctx = test_ctx.handler_context();
        handle(&mut ctx, &token, "/../bob").await.unwrap();

        match read_server_message(&mut test_ctx).await {
            ServerMessage::FileListResponse { success, error, .. } => {
                assert!(!success);
                assert_eq!(
                    error.unwrap().error_code(),
                    Some(ErrorCode::PermissionDenied)
                );
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }
}
