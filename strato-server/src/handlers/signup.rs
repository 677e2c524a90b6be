//! Signup handler

use std::io;

use tokio::io::AsyncWrite;

use strato_common::protocol::ServerMessage;
use strato_common::validators::{validate_password, validate_username};
use strato_common::{ErrorCode, ErrorInfo};

use crate::constants::{ERR_PASSWORD_INVALID, ERR_USER_EXISTS, ERR_USERNAME_INVALID};
use crate::db::{CreateUserError, hash_password};
use crate::files::ensure_user_area;
use crate::handlers::{HandlerContext, current_timestamp};

/// Handle a Signup message
///
/// Creates the account, its storage directory and an initial session. If the
/// storage directory cannot be created the account row is rolled back so the
/// username stays available.
pub async fn handle<W>(
    ctx: &mut HandlerContext<'_, W>,
    username: &str,
    password: &str,
) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    if validate_username(username).is_err() {
        return send_failure(
            ctx,
            ErrorInfo::new(ErrorCode::InvalidCredentials, ERR_USERNAME_INVALID),
        )
        .await;
    }
    if validate_password(password).is_err() {
        return send_failure(
            ctx,
            ErrorInfo::new(ErrorCode::InvalidCredentials, ERR_PASSWORD_INVALID),
        )
        .await;
    }

    let password_hash = match hash_password(password, false) {
        Ok(hash) => hash,
        Err(e) => {
            return send_failure(ctx, ErrorInfo::new(ErrorCode::UnknownError, e.to_string()))
                .await;
        }
    };

    let user = match ctx
        .db
        .users
        .create_user(username, &password_hash, current_timestamp())
        .await
    {
        Ok(user) => user,
        Err(CreateUserError::AlreadyExists) => {
            return send_failure(ctx, ErrorInfo::new(ErrorCode::UserExists, ERR_USER_EXISTS))
                .await;
        }
        Err(CreateUserError::Database(e)) => {
            return send_failure(ctx, ErrorInfo::new(ErrorCode::UnknownError, e)).await;
        }
    };

    if let Err(e) = ensure_user_area(ctx.file_root, username) {
        // Roll back so a later signup can retry with the same name
        if let Err(del_err) = ctx.db.users.delete_user(user.id).await {
            eprintln!(
                "Failed to roll back user {} after storage error: {}",
                username, del_err
            );
        }
        return send_failure(ctx, ErrorInfo::new(ErrorCode::UnknownError, e.to_string())).await;
    }

    let token = ctx.sessions.create(user.id, username);

    ctx.send_message(ServerMessage::SignupResponse {
        success: true,
        token: Some(token),
        error: None,
    })
    .await
}

async fn send_failure<W>(ctx: &mut HandlerContext<'_, W>, error: ErrorInfo) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    ctx.send_message(ServerMessage::SignupResponse {
        success: false,
        token: None,
        error: Some(error),
    })
    .await
}
