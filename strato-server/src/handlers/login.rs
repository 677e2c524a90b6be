//! Login handler

use std::io;

use tokio::io::AsyncWrite;

use strato_common::protocol::ServerMessage;
use strato_common::{ErrorCode, ErrorInfo};

use crate::constants::ERR_INVALID_CREDENTIALS;
use crate::db::verify_password;
use crate::files::ensure_user_area;
use crate::handlers::HandlerContext;

/// Handle a Login message
///
/// Unknown usernames and wrong passwords produce the same error so the
/// response never confirms whether an account exists.
pub async fn handle<W>(
    ctx: &mut HandlerContext<'_, W>,
    username: &str,
    password: &str,
) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let user = match ctx.db.users.get_user_by_username(username).await {
        Ok(Some(user)) => user,
        Ok(None) => return send_invalid_credentials(ctx).await,
        Err(e) => {
            return send_failure(ctx, ErrorInfo::new(ErrorCode::UnknownError, e.to_string()))
                .await;
        }
    };

    match verify_password(password, &user.password_hash) {
        Ok(true) => {}
        // Wrong password, or a password that fails validation outright
        Ok(false) | Err(_) => return send_invalid_credentials(ctx).await,
    }

    // Recreate the storage area if it went missing between sessions
    if let Err(e) = ensure_user_area(ctx.file_root, &user.username) {
        return send_failure(ctx, ErrorInfo::new(ErrorCode::UnknownError, e.to_string())).await;
    }

    let token = ctx.sessions.create(user.id, &user.username);

    ctx.send_message(ServerMessage::LoginResponse {
        success: true,
        token: Some(token),
        expires_in: Some(ctx.sessions.ttl_secs()),
        error: None,
    })
    .await
}

async fn send_invalid_credentials<W>(ctx: &mut HandlerContext<'_, W>) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    send_failure(
        ctx,
        ErrorInfo::new(ErrorCode::InvalidCredentials, ERR_INVALID_CREDENTIALS),
    )
    .await
}

async fn send_failure<W>(ctx: &mut HandlerContext<'_, W>, error: ErrorInfo) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    ctx.send_message(ServerMessage::LoginResponse {
        success: false,
        token: None,
        expires_in: None,
        error: Some(error),
    })
    .await
}

#[cfg(test)]
mod tests {
    use strato_common::validators::validate_token;

    use super::*;
    use crate::db::hash_password;
    use crate::handlers::current_timestamp;
    use crate::handlers::testing::{create_test_context, read_server_message};

    async fn create_account(test_ctx: &crate::handlers::testing::TestContext) {
        let hash = hash_password("password123", true).unwrap();
        test_ctx
            .db
            .users
            .create_user("alice", &hash, current_timestamp())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_login_success() {
        let mut test_ctx = create_test_context().await;
        create_account(&test_ctx).await;

        let mut ctx = test_ctx.handler_context();
        handle(&mut ctx, "alice", "password123").await.unwrap();

        match read_server_message(&mut test_ctx).await {
            ServerMessage::LoginResponse {
                success,
                token,
                expires_in,
                error,
            } => {
                assert!(success);
                assert!(validate_token(&token.unwrap()).is_ok());
                assert_eq!(expires_in, Some(3600));
                assert!(error.is_none());
            }
            other => panic!("unexpected response: {:?}", other),
        }

        // Login creates the storage area if signup never ran on this root
        assert!(crate::files::user_area(test_ctx.file_root, "alice").is_dir());
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let mut test_ctx = create_test_context().await;
        create_account(&test_ctx).await;

        let mut ctx = test_ctx.handler_context();
        handle(&mut ctx, "alice", "wrong_password").await.unwrap();

        match read_server_message(&mut test_ctx).await {
            ServerMessage::LoginResponse {
                success,
                token,
                error,
                ..
            } => {
                assert!(!success);
                assert!(token.is_none());
                assert_eq!(
                    error.unwrap().error_code(),
                    Some(ErrorCode::InvalidCredentials)
                );
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_login_unknown_user_same_error() {
        let mut test_ctx = create_test_context().await;
        create_account(&test_ctx).await;

        let mut ctx = test_ctx.handler_context();
        handle(&mut ctx, "nobody", "password123").await.unwrap();
        let unknown_user = match read_server_message(&mut test_ctx).await {
            ServerMessage::LoginResponse { error, .. } => error.unwrap(),
            other => panic!("unexpected response: {:?}", other),
        };

        let mut ctx = test_ctx.handler_context();
        handle(&mut ctx, "alice", "wrong_password").await.unwrap();
        let wrong_password = match read_server_message(&mut test_ctx).await {
            ServerMessage::LoginResponse { error, .. } => error.unwrap(),
            other => panic!("unexpected response: {:?}", other),
        };

        // Indistinguishable responses
        assert_eq!(unknown_user, wrong_password);
    }

    #[tokio::test]
    async fn test_login_username_is_case_sensitive() {
        let mut test_ctx = create_test_context().await;
        create_account(&test_ctx).await;

        let mut ctx = test_ctx.handler_context();
        handle(&mut ctx, "Alice", "password123").await.unwrap();

        match read_server_message(&mut test_ctx).await {
            ServerMessage::LoginResponse { success, error, .. } => {
                assert!(!success);
                assert_eq!(
                    error.unwrap().error_code(),
                    Some(ErrorCode::InvalidCredentials)
                );
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }
}
