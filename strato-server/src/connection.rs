//! Per-connection message loop
//!
//! One task per connection. Requests are handled strictly in order; the
//! server never sends unsolicited messages, so no outbound queue is needed.

use std::io;
use std::net::SocketAddr;
use std::path::Path;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use strato_common::framing::{
    DEFAULT_FRAME_TIMEOUT, DEFAULT_IDLE_TIMEOUT, FrameError, FrameReader, FrameWriter, MessageId,
};
use strato_common::io::{
    read_client_message_with_full_timeout, read_client_message_with_timeout,
    send_server_message_with_id,
};
use strato_common::protocol::{ClientMessage, ServerMessage};

use crate::constants::{ERR_HANDLING_MESSAGE, ERR_INVALID_MESSAGE_FORMAT};
use crate::db::Database;
use crate::handlers::{
    HandlerContext, file_create_dir, file_delete, file_list, file_read, file_rename, file_write,
    login, signup,
};
use crate::sessions::SessionManager;

/// Everything a connection task needs, cloned per accepted socket
#[derive(Clone)]
pub struct ConnectionParams {
    pub peer_addr: SocketAddr,
    pub db: Database,
    pub sessions: SessionManager,
    pub file_root: &'static Path,
    pub debug: bool,
}

/// Run the message loop for one client connection
///
/// Returns when the client disconnects, a frame error occurs, or a response
/// cannot be written.
pub async fn handle_connection<S>(stream: S, params: ConnectionParams) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (read_half, write_half) = tokio::io::split(stream);
    let mut frame_reader = FrameReader::new(BufReader::new(read_half));
    let mut frame_writer = FrameWriter::new(write_half);

    // The first message gets an idle timeout so dead connections that never
    // speak are reclaimed. After that, clients may idle between requests.
    let mut first_message = true;

    loop {
        let result = if first_message {
            read_client_message_with_full_timeout(
                &mut frame_reader,
                Some(DEFAULT_IDLE_TIMEOUT),
                Some(DEFAULT_FRAME_TIMEOUT),
            )
            .await
        } else {
            read_client_message_with_timeout(&mut frame_reader).await
        };
        first_message = false;

        let received = match result {
            Ok(Some(received)) => received,
            // Clean disconnect
            Ok(None) => break,
            Err(e) => {
                if params.debug || !is_common_error(&e) {
                    eprintln!("{} from {}: {}", ERR_INVALID_MESSAGE_FORMAT, params.peer_addr, e);
                }
                // Best effort; the connection is closing either way
                let _ = send_server_message_with_id(
                    &mut frame_writer,
                    &ServerMessage::Error {
                        message: ERR_INVALID_MESSAGE_FORMAT.to_string(),
                    },
                    MessageId::new(),
                )
                .await;
                break;
            }
        };

        if params.debug {
            println!("{} -> {:?}", params.peer_addr, received.message);
        }

        let mut ctx = HandlerContext {
            frame_writer: &mut frame_writer,
            peer_addr: params.peer_addr,
            db: &params.db,
            sessions: &params.sessions,
            file_root: params.file_root,
            debug: params.debug,
            message_id: received.message_id,
        };

        if let Err(e) = dispatch(&mut ctx, &received.message).await {
            eprintln!("{}{}: {}", ERR_HANDLING_MESSAGE, params.peer_addr, e);
            break;
        }
    }

    frame_writer.get_mut().shutdown().await.ok();
    Ok(())
}

async fn dispatch<W>(ctx: &mut HandlerContext<'_, W>, message: &ClientMessage) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    match message {
        ClientMessage::Signup { username, password } => {
            signup::handle(ctx, username, password).await
        }
        ClientMessage::Login { username, password } => login::handle(ctx, username, password).await,
        ClientMessage::FileList { token, path } => file_list::handle(ctx, token, path).await,
        ClientMessage::FileRead { token, path } => file_read::handle(ctx, token, path).await,
        ClientMessage::FileWrite {
            token,
            path,
            content,
        } => file_write::handle(ctx, token, path, content).await,
        ClientMessage::FileDelete {
            token,
            path,
            recursive,
        } => file_delete::handle(ctx, token, path, *recursive).await,
        ClientMessage::FileCreateDir { token, path } => {
            file_create_dir::handle(ctx, token, path).await
        }
        ClientMessage::FileRename {
            token,
            path,
            new_path,
        } => file_rename::handle(ctx, token, path, new_path).await,
    }
}

/// Errors that routine port scanners and timeouts produce constantly;
/// logged only in debug mode to keep output readable.
fn is_common_error(error: &FrameError) -> bool {
    matches!(
        error,
        FrameError::InvalidMagic | FrameError::FrameTimeout | FrameError::IdleTimeout
    )
}
