//! I/O utilities for sending and receiving protocol messages
//!
//! This module provides the interface between the protocol message types
//! (`ClientMessage`, `ServerMessage`) and the wire format (framing).

use std::io;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::framing::{
    DEFAULT_FRAME_TIMEOUT, DEFAULT_IDLE_TIMEOUT, FrameError, FrameReader, FrameWriter, MessageId,
    RawFrame,
};
use crate::protocol::{ClientMessage, ServerMessage};

// =============================================================================
// Message Sending
// =============================================================================

/// Send a `ClientMessage` to the server
///
/// Generates a new message ID for request-response correlation.
/// Returns the message ID that was used.
pub async fn send_client_message<W>(
    writer: &mut FrameWriter<W>,
    message: &ClientMessage,
) -> io::Result<MessageId>
where
    W: AsyncWriteExt + Unpin,
{
    let message_id = MessageId::new();
    send_client_message_with_id(writer, message, message_id).await?;
    Ok(message_id)
}

/// Send a `ClientMessage` to the server with a specific message ID
pub async fn send_client_message_with_id<W>(
    writer: &mut FrameWriter<W>,
    message: &ClientMessage,
    message_id: MessageId,
) -> io::Result<()>
where
    W: AsyncWriteExt + Unpin,
{
    let message_type = client_message_type(message);
    let payload =
        serde_json::to_vec(message).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    let frame = RawFrame::new(message_id, message_type.to_string(), payload);
    writer.write_frame(&frame).await.map_err(Into::into)
}

/// Send a `ServerMessage` to a client
///
/// Generates a new message ID. For responses, use `send_server_message_with_id`
/// to echo the request's message ID.
pub async fn send_server_message<W>(
    writer: &mut FrameWriter<W>,
    message: &ServerMessage,
) -> io::Result<MessageId>
where
    W: AsyncWriteExt + Unpin,
{
    let message_id = MessageId::new();
    send_server_message_with_id(writer, message, message_id).await?;
    Ok(message_id)
}

/// Send a `ServerMessage` to a client with a specific message ID
///
/// Use this to echo the request's message ID in responses.
pub async fn send_server_message_with_id<W>(
    writer: &mut FrameWriter<W>,
    message: &ServerMessage,
    message_id: MessageId,
) -> io::Result<()>
where
    W: AsyncWriteExt + Unpin,
{
    let message_type = server_message_type(message);
    let payload =
        serde_json::to_vec(message).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    let frame = RawFrame::new(message_id, message_type.to_string(), payload);
    writer.write_frame(&frame).await.map_err(Into::into)
}

// =============================================================================
// Message Receiving
// =============================================================================

/// Received client message with its message ID
#[derive(Debug)]
pub struct ReceivedClientMessage {
    /// The message ID from the frame (for response correlation)
    pub message_id: MessageId,
    /// The parsed client message
    pub message: ClientMessage,
}

/// Received server message with its message ID
#[derive(Debug)]
pub struct ReceivedServerMessage {
    /// The message ID from the frame (for request correlation)
    pub message_id: MessageId,
    /// The parsed server message
    pub message: ServerMessage,
}

/// Read a `ClientMessage` from the stream
///
/// Returns `Ok(None)` if the connection was cleanly closed.
///
/// # Note
///
/// This method has no timeout - it will wait indefinitely for data.
/// For production use, prefer [`read_client_message_with_timeout`].
pub async fn read_client_message<R>(
    reader: &mut FrameReader<R>,
) -> io::Result<Option<ReceivedClientMessage>>
where
    R: AsyncReadExt + Unpin,
{
    let Some(frame) = reader.read_frame().await? else {
        return Ok(None);
    };

    parse_client_frame(frame).map(Some)
}

/// Read a `ClientMessage` from the stream with a timeout
///
/// This method waits indefinitely for the first byte (allowing idle connections),
/// but once the first byte is received, the entire frame must complete within
/// 60 seconds. This protects against slowloris-style attacks while still
/// allowing a client to sit idle between commands.
///
/// Returns `Ok(None)` if the connection was cleanly closed.
pub async fn read_client_message_with_timeout<R>(
    reader: &mut FrameReader<R>,
) -> Result<Option<ReceivedClientMessage>, FrameError>
where
    R: AsyncReadExt + Unpin,
{
    let Some(frame) = reader.read_frame_with_timeout(DEFAULT_FRAME_TIMEOUT).await? else {
        return Ok(None);
    };

    parse_client_frame(frame)
        .map(Some)
        .map_err(|e| FrameError::InvalidJson(e.to_string()))
}

/// Read a `ClientMessage` from the stream with full timeout (no idle allowed)
///
/// Unlike [`read_client_message_with_timeout`], this method applies a timeout
/// to the entire read operation, including waiting for the first byte. The
/// server uses this before the first message of a connection so that silent
/// connections are shed quickly.
///
/// Returns `Ok(None)` if the connection was cleanly closed.
///
/// # Arguments
///
/// * `reader` - The frame reader to read from
/// * `idle_timeout` - Maximum time to wait for the first byte (defaults to 30 seconds)
/// * `frame_timeout` - Maximum time to complete the frame after the first byte (defaults to 60 seconds)
pub async fn read_client_message_with_full_timeout<R>(
    reader: &mut FrameReader<R>,
    idle_timeout: Option<Duration>,
    frame_timeout: Option<Duration>,
) -> Result<Option<ReceivedClientMessage>, FrameError>
where
    R: AsyncReadExt + Unpin,
{
    let idle = idle_timeout.unwrap_or(DEFAULT_IDLE_TIMEOUT);
    let frame_time = frame_timeout.unwrap_or(DEFAULT_FRAME_TIMEOUT);

    let Some(frame) = reader.read_frame_with_full_timeout(idle, frame_time).await? else {
        return Ok(None);
    };

    parse_client_frame(frame)
        .map(Some)
        .map_err(|e| FrameError::InvalidJson(e.to_string()))
}

/// Read a `ServerMessage` from the stream
///
/// Returns `Ok(None)` if the connection was cleanly closed.
pub async fn read_server_message<R>(
    reader: &mut FrameReader<R>,
) -> io::Result<Option<ReceivedServerMessage>>
where
    R: AsyncReadExt + Unpin,
{
    let Some(frame) = reader.read_frame().await? else {
        return Ok(None);
    };

    parse_server_frame(frame).map(Some)
}

/// Parse a raw frame into a `ReceivedClientMessage`
fn parse_client_frame(frame: RawFrame) -> io::Result<ReceivedClientMessage> {
    // Parse the JSON payload
    let message: ClientMessage = serde_json::from_slice(&frame.payload)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("invalid JSON: {e}")))?;

    // Validate that the frame type matches the message type
    let expected_type = client_message_type(&message);
    if frame.message_type != expected_type {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "frame type mismatch: frame says '{}' but JSON is '{}'",
                frame.message_type, expected_type
            ),
        ));
    }

    Ok(ReceivedClientMessage {
        message_id: frame.message_id,
        message,
    })
}

/// Parse a raw frame into a `ReceivedServerMessage`
fn parse_server_frame(frame: RawFrame) -> io::Result<ReceivedServerMessage> {
    // Parse the JSON payload
    let message: ServerMessage = serde_json::from_slice(&frame.payload)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("invalid JSON: {e}")))?;

    // Validate that the frame type matches the message type
    let expected_type = server_message_type(&message);
    if frame.message_type != expected_type {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "frame type mismatch: frame says '{}' but JSON is '{}'",
                frame.message_type, expected_type
            ),
        ));
    }

    Ok(ReceivedServerMessage {
        message_id: frame.message_id,
        message,
    })
}

// =============================================================================
// Message Type Helpers
// =============================================================================

/// Get the type name for a client message (matches enum variant name)
#[must_use]
pub fn client_message_type(message: &ClientMessage) -> &'static str {
    match message {
        ClientMessage::Signup { .. } => "Signup",
        ClientMessage::Login { .. } => "Login",
        ClientMessage::FileList { .. } => "FileList",
        ClientMessage::FileRead { .. } => "FileRead",
        ClientMessage::FileWrite { .. } => "FileWrite",
        ClientMessage::FileDelete { .. } => "FileDelete",
        ClientMessage::FileCreateDir { .. } => "FileCreateDir",
        ClientMessage::FileRename { .. } => "FileRename",
    }
}

/// Get the type name for a server message (matches enum variant name)
#[must_use]
pub fn server_message_type(message: &ServerMessage) -> &'static str {
    match message {
        ServerMessage::SignupResponse { .. } => "SignupResponse",
        ServerMessage::LoginResponse { .. } => "LoginResponse",
        ServerMessage::FileListResponse { .. } => "FileListResponse",
        ServerMessage::FileReadResponse { .. } => "FileReadResponse",
        ServerMessage::FileWriteResponse { .. } => "FileWriteResponse",
        ServerMessage::FileDeleteResponse { .. } => "FileDeleteResponse",
        ServerMessage::FileCreateDirResponse { .. } => "FileCreateDirResponse",
        ServerMessage::FileRenameResponse { .. } => "FileRenameResponse",
        ServerMessage::Error { .. } => "Error",
    }
}

// =============================================================================
// Tests
// =============================================================================
