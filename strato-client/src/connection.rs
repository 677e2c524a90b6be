//! Request/response transport over a framed stream
//!
//! Each request is matched to its response by message ID. Responses with a
//! stale ID (left over from an earlier timed-out request) are skipped.

use std::fmt;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

use strato_common::framing::{FrameReader, FrameWriter};
use strato_common::io::{read_server_message, send_client_message};
use strato_common::protocol::{ClientMessage, ServerMessage};

/// Failure modes for a single request
#[derive(Debug)]
pub enum RequestError {
    /// No response arrived within the request timeout
    Timeout,
    /// The server closed the connection
    Closed,
    /// Transport failure
    Io(String),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "request timed out"),
            Self::Closed => write!(f, "server closed the connection"),
            Self::Io(e) => write!(f, "connection error: {}", e),
        }
    }
}

impl std::error::Error for RequestError {}

/// A framed connection to the server
pub struct ServerConnection<R, W> {
    reader: FrameReader<BufReader<R>>,
    writer: FrameWriter<W>,
    timeout: Duration,
}

impl ServerConnection<OwnedReadHalf, OwnedWriteHalf> {
    /// Connect over TCP
    pub async fn connect(addr: &str, timeout: Duration) -> std::io::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        let (read_half, write_half) = stream.into_split();
        Ok(Self::from_parts(read_half, write_half, timeout))
    }
}

impl<R, W> ServerConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn from_parts(reader: R, writer: W, timeout: Duration) -> Self {
        Self {
            reader: FrameReader::new(BufReader::new(reader)),
            writer: FrameWriter::new(writer),
            timeout,
        }
    }

    /// Send a request and wait for its response
    ///
    /// The timeout covers the whole exchange. Responses carrying a different
    /// message ID are discarded; they belong to requests that already timed
    /// out.
    pub async fn request(&mut self, message: ClientMessage) -> Result<ServerMessage, RequestError> {
        let exchange = async {
            let sent_id = send_client_message(&mut self.writer, &message)
                .await
                .map_err(|e| RequestError::Io(e.to_string()))?;

            loop {
                let received = read_server_message(&mut self.reader)
                    .await
                    .map_err(|e| RequestError::Io(e.to_string()))?
                    .ok_or(RequestError::Closed)?;

                if received.message_id == sent_id {
                    return Ok(received.message);
                }
                // Stale response from an earlier timed-out request
            }
        };

        match tokio::time::timeout(self.timeout, exchange).await {
            Ok(result) => result,
            Err(_) => Err(RequestError::Timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use strato_common::framing::MessageId;
    use strato_common::io::{read_client_message, send_server_message_with_id};

    use super::*;

    async fn pair(
        timeout: Duration,
    ) -> (
        ServerConnection<
            tokio::io::ReadHalf<tokio::io::DuplexStream>,
            tokio::io::WriteHalf<tokio::io::DuplexStream>,
        >,
        FrameReader<BufReader<tokio::io::ReadHalf<tokio::io::DuplexStream>>>,
        FrameWriter<tokio::io::WriteHalf<tokio::io::DuplexStream>>,
    ) {
        let (client_stream, server_stream) = tokio::io::duplex(64 * 1024);
        let (client_read, client_write) = tokio::io::split(client_stream);
        let (server_read, server_write) = tokio::io::split(server_stream);
        (
            ServerConnection::from_parts(client_read, client_write, timeout),
            FrameReader::new(BufReader::new(server_read)),
            FrameWriter::new(server_write),
        )
    }

    fn list_request() -> ClientMessage {
        ClientMessage::FileList {
            token: "ffeeddccbbaa99887766554433221100".to_string(),
            path: "/".to_string(),
        }
    }

    fn empty_list_response() -> ServerMessage {
        ServerMessage::FileListResponse {
            success: true,
            path: Some("/".to_string()),
            entries: Some(Vec::new()),
            error: None,
        }
    }

    #[tokio::test]
    async fn test_request_matches_response_id() {
        let (mut conn, mut server_reader, mut server_writer) =
            pair(Duration::from_secs(5)).await;

        let server = tokio::spawn(async move {
            let received = read_client_message(&mut server_reader)
                .await
                .unwrap()
                .unwrap();
            send_server_message_with_id(
                &mut server_writer,
                &empty_list_response(),
                received.message_id,
            )
            .await
            .unwrap();
        });

        let response = conn.request(list_request()).await.unwrap();
        assert!(matches!(
            response,
            ServerMessage::FileListResponse { success: true, .. }
        ));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_stale_response_is_skipped() {
        let (mut conn, mut server_reader, mut server_writer) =
            pair(Duration::from_secs(5)).await;

        let server = tokio::spawn(async move {
            let received = read_client_message(&mut server_reader)
                .await
                .unwrap()
                .unwrap();
            // A response for some other request comes first
            let stale_id = MessageId::from_bytes(b"aaaaaaaaaaaa").unwrap();
            send_server_message_with_id(&mut server_writer, &empty_list_response(), stale_id)
                .await
                .unwrap();
            send_server_message_with_id(
                &mut server_writer,
                &empty_list_response(),
                received.message_id,
            )
            .await
            .unwrap();
        });

        let response = conn.request(list_request()).await.unwrap();
        assert!(matches!(
            response,
            ServerMessage::FileListResponse { success: true, .. }
        ));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_request_times_out() {
        let (mut conn, _server_reader, _server_writer) =
            pair(Duration::from_millis(50)).await;

        // Server never answers
        let result = conn.request(list_request()).await;
        assert!(matches!(result, Err(RequestError::Timeout)));
    }

    #[tokio::test]
    async fn test_closed_connection_reported() {
        let (mut conn, server_reader, server_writer) = pair(Duration::from_secs(5)).await;
        drop(server_reader);
        drop(server_writer);

        let result = conn.request(list_request()).await;
        assert!(matches!(
            result,
            Err(RequestError::Closed) | Err(RequestError::Io(_))
        ));
    }
}
