//! Frame reader for parsing protocol messages from a stream

use std::io;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::time::timeout;

use super::error::FrameError;
use super::frame::RawFrame;
use super::limits::{is_known_message_type, max_payload_for_type};
use super::message_id::MessageId;
use super::{
    DELIMITER, MAGIC, MAX_PAYLOAD_LENGTH_DIGITS, MAX_TYPE_LENGTH, MAX_TYPE_LENGTH_DIGITS,
    MSG_ID_LENGTH, TERMINATOR,
};

/// Default timeout for completing a frame once the first byte is received
pub const DEFAULT_FRAME_TIMEOUT: Duration = Duration::from_secs(60);

/// Default idle timeout (waiting for the first byte of a frame)
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Reads protocol frames from an async reader
pub struct FrameReader<R> {
    reader: R,
}

impl<R> FrameReader<R> {
    /// Create a new frame reader
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Get a mutable reference to the underlying reader
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    /// Consume the frame reader and return the underlying reader
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: AsyncReadExt + Unpin> FrameReader<R> {
    /// Read the next frame from the stream
    ///
    /// Returns `Ok(None)` if the connection is cleanly closed.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame is malformed or an I/O error occurs.
    ///
    /// # Note
    ///
    /// This method has no timeout - it will wait indefinitely for data.
    /// For production use, prefer [`read_frame_with_timeout`](Self::read_frame_with_timeout).
    pub async fn read_frame(&mut self) -> Result<Option<RawFrame>, FrameError> {
        let first_byte = match self.read_byte_allow_eof().await? {
            Some(b) => b,
            None => return Ok(None), // Clean disconnect
        };

        self.read_frame_after_first_byte(first_byte).await
    }

    /// Read the next frame from the stream with a timeout
    ///
    /// This method waits indefinitely for the first byte (allowing idle
    /// connections), but once the first byte is received the entire frame must
    /// complete within `frame_timeout`. This protects against slowloris-style
    /// peers while still allowing clients to idle between requests.
    ///
    /// Returns `Ok(None)` if the connection is cleanly closed.
    pub async fn read_frame_with_timeout(
        &mut self,
        frame_timeout: Duration,
    ) -> Result<Option<RawFrame>, FrameError> {
        let first_byte = match self.read_byte_allow_eof().await? {
            Some(b) => b,
            None => return Ok(None), // Clean disconnect
        };

        match timeout(frame_timeout, self.read_frame_after_first_byte(first_byte)).await {
            Ok(result) => result,
            Err(_) => Err(FrameError::FrameTimeout),
        }
    }

    /// Read the next frame from the stream with a full timeout (including idle wait)
    ///
    /// Unlike [`read_frame_with_timeout`](Self::read_frame_with_timeout), this
    /// method also bounds the wait for the first byte. This is appropriate for
    /// connections that have not yet sent anything useful, where idling is a
    /// resource-exhaustion vector.
    ///
    /// Returns `Ok(None)` if the connection is cleanly closed.
    ///
    /// # Arguments
    ///
    /// * `idle_timeout` - Maximum time to wait for the first byte
    /// * `frame_timeout` - Maximum time to complete the frame after the first byte
    pub async fn read_frame_with_full_timeout(
        &mut self,
        idle_timeout: Duration,
        frame_timeout: Duration,
    ) -> Result<Option<RawFrame>, FrameError> {
        let first_byte = match timeout(idle_timeout, self.read_byte_allow_eof()).await {
            Ok(Ok(Some(b))) => b,
            Ok(Ok(None)) => return Ok(None), // Clean disconnect
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(FrameError::IdleTimeout),
        };

        match timeout(frame_timeout, self.read_frame_after_first_byte(first_byte)).await {
            Ok(result) => result,
            Err(_) => Err(FrameError::FrameTimeout),
        }
    }

    /// Complete reading a frame after the first byte has been received
    async fn read_frame_after_first_byte(
        &mut self,
        first_byte: u8,
    ) -> Result<Option<RawFrame>, FrameError> {
        // Step 1: Complete reading magic bytes (we already have the first one)
        if first_byte != MAGIC[0] {
            return Err(FrameError::InvalidMagic);
        }

        let mut magic_rest = [0u8; 2];
        self.reader.read_exact(&mut magic_rest).await?;
        if magic_rest != MAGIC[1..] {
            return Err(FrameError::InvalidMagic);
        }

        // Step 2: Read type length
        let type_length = self
            .read_length_field(
                MAX_TYPE_LENGTH_DIGITS,
                FrameError::InvalidTypeLength,
                FrameError::TypeLengthTooManyDigits,
            )
            .await?;
        if type_length == 0 || type_length > MAX_TYPE_LENGTH as u64 {
            return Err(FrameError::TypeLengthOutOfRange);
        }

        // Step 3: Read message type
        let mut type_bytes = vec![0u8; type_length as usize];
        self.reader.read_exact(&mut type_bytes).await?;
        let message_type = String::from_utf8(type_bytes)
            .map_err(|_| FrameError::UnknownMessageType("<invalid utf8>".to_string()))?;

        // Step 4: Reject unknown message types early
        if !is_known_message_type(&message_type) {
            return Err(FrameError::UnknownMessageType(message_type));
        }

        // Step 5: Read delimiter
        if self.read_byte().await? != DELIMITER {
            return Err(FrameError::MissingDelimiter);
        }

        // Step 6: Read message ID
        let mut msg_id_bytes = [0u8; MSG_ID_LENGTH];
        self.reader.read_exact(&mut msg_id_bytes).await?;
        let message_id = MessageId::from_bytes(&msg_id_bytes)?;

        // Step 7: Read delimiter
        if self.read_byte().await? != DELIMITER {
            return Err(FrameError::MissingDelimiter);
        }

        // Step 8: Read payload length
        let payload_length = self
            .read_length_field(
                MAX_PAYLOAD_LENGTH_DIGITS,
                FrameError::InvalidPayloadLength,
                FrameError::PayloadLengthTooManyDigits,
            )
            .await?;

        // Validate payload length against per-type maximum (0 = unlimited)
        let max_for_type = max_payload_for_type(&message_type);
        if max_for_type > 0 && payload_length > max_for_type {
            return Err(FrameError::PayloadLengthExceedsTypeMax {
                message_type,
                length: payload_length,
                max: max_for_type,
            });
        }

        // Step 9: Read the payload
        let mut payload = vec![0u8; payload_length as usize];
        self.reader.read_exact(&mut payload).await?;

        // Step 10: Read terminator
        if self.read_byte().await? != TERMINATOR {
            return Err(FrameError::MissingTerminator);
        }

        Ok(Some(RawFrame::new(message_id, message_type, payload)))
    }

    /// Read a single byte, returning None on clean EOF
    async fn read_byte_allow_eof(&mut self) -> Result<Option<u8>, FrameError> {
        let mut buf = [0u8; 1];
        match self.reader.read_exact(&mut buf).await {
            Ok(_) => Ok(Some(buf[0])),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Read a single byte
    async fn read_byte(&mut self) -> Result<u8, FrameError> {
        let mut buf = [0u8; 1];
        self.reader.read_exact(&mut buf).await?;
        Ok(buf[0])
    }

    /// Read a length field (digits terminated by delimiter)
    ///
    /// # Arguments
    ///
    /// * `max_digits` - Maximum number of digits allowed
    /// * `invalid_err` - Error if the field is empty or not a number
    /// * `too_many_err` - Error if the field exceeds `max_digits`
    async fn read_length_field(
        &mut self,
        max_digits: usize,
        invalid_err: FrameError,
        too_many_err: FrameError,
    ) -> Result<u64, FrameError> {
        let mut digits = Vec::with_capacity(max_digits);

        for _ in 0..=max_digits {
            let byte = self.read_byte().await?;

            if byte == DELIMITER {
                if digits.is_empty() {
                    return Err(invalid_err);
                }
                let s = std::str::from_utf8(&digits).map_err(|_| invalid_err.clone())?;
                return s.parse().map_err(|_| invalid_err.clone());
            }

            if !byte.is_ascii_digit() {
                return Err(invalid_err);
            }

            digits.push(byte);
        }

        // Read max_digits + 1 bytes without finding the delimiter
        Err(too_many_err)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn test_id() -> MessageId {
        MessageId::from_bytes(b"00aa11bb22cc").unwrap()
    }

    async fn read_one(bytes: &[u8]) -> Result<Option<RawFrame>, FrameError> {
        let mut reader = FrameReader::new(Cursor::new(bytes.to_vec()));
        reader.read_frame().await
    }

    #[tokio::test]
    async fn test_read_valid_frame() {
        let frame = RawFrame::new(test_id(), "Login".to_string(), b"{\"x\":1}".to_vec());
        let result = read_one(&frame.to_bytes()).await.unwrap().unwrap();
        assert_eq!(result, frame);
    }

    #[tokio::test]
    async fn test_read_clean_eof() {
        let result = read_one(b"").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_read_two_frames_sequentially() {
        let a = RawFrame::new(test_id(), "FileList".to_string(), b"{}".to_vec());
        let b = RawFrame::new(test_id(), "FileRead".to_string(), b"{}".to_vec());
        let mut bytes = a.to_bytes();
        bytes.extend_from_slice(&b.to_bytes());

        let mut reader = FrameReader::new(Cursor::new(bytes));
        assert_eq!(reader.read_frame().await.unwrap().unwrap(), a);
        assert_eq!(reader.read_frame().await.unwrap().unwrap(), b);
        assert!(reader.read_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_magic() {
        let result = read_one(b"XX|5|Login|00aa11bb22cc|2|{}\n").await;
        assert_eq!(result, Err(FrameError::InvalidMagic));
    }

    #[tokio::test]
    async fn test_unknown_message_type() {
        let result = read_one(b"SB|8|ChatSend|00aa11bb22cc|2|{}\n").await;
        assert_eq!(
            result,
            Err(FrameError::UnknownMessageType("ChatSend".to_string()))
        );
    }

    #[tokio::test]
    async fn test_invalid_message_id() {
        let result = read_one(b"SB|5|Login|00AA11BB22CC|2|{}\n").await;
        assert_eq!(result, Err(FrameError::InvalidMessageId));
    }

    #[tokio::test]
    async fn test_missing_terminator() {
        let result = read_one(b"SB|5|Login|00aa11bb22cc|2|{}X").await;
        assert_eq!(result, Err(FrameError::MissingTerminator));
    }

    #[tokio::test]
    async fn test_empty_length_field() {
        let result = read_one(b"SB||Login|00aa11bb22cc|2|{}\n").await;
        assert_eq!(result, Err(FrameError::InvalidTypeLength));
    }

    #[tokio::test]
    async fn test_non_numeric_length_field() {
        let result = read_one(b"SB|x|Login|00aa11bb22cc|2|{}\n").await;
        assert_eq!(result, Err(FrameError::InvalidTypeLength));
    }

    #[tokio::test]
    async fn test_payload_exceeds_type_limit() {
        // Declare a payload far beyond the Signup limit; no payload bytes needed
        // since the header check rejects first.
        let result = read_one(b"SB|6|Signup|00aa11bb22cc|99999999|").await;
        match result {
            Err(FrameError::PayloadLengthExceedsTypeMax { message_type, .. }) => {
                assert_eq!(message_type, "Signup");
            }
            other => panic!("expected PayloadLengthExceedsTypeMax, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_payload_length_too_many_digits() {
        let result = read_one(b"SB|8|FileList|00aa11bb22cc|123456789|").await;
        assert_eq!(result, Err(FrameError::PayloadLengthTooManyDigits));
    }

    #[tokio::test]
    async fn test_truncated_frame_is_connection_closed() {
        let result = read_one(b"SB|5|Login|00aa11bb22cc|10|{}").await;
        assert_eq!(result, Err(FrameError::ConnectionClosed));
    }

    #[tokio::test]
    async fn test_idle_timeout() {
        // A socket pair with no data triggers the idle timeout
        let (client, server) = tokio::io::duplex(64);
        let mut reader = FrameReader::new(server);
        let result = reader
            .read_frame_with_full_timeout(Duration::from_millis(20), Duration::from_secs(1))
            .await;
        assert_eq!(result, Err(FrameError::IdleTimeout));
        drop(client);
    }

    #[tokio::test]
    async fn test_frame_timeout_after_first_byte() {
        use tokio::io::AsyncWriteExt;

        let (mut client, server) = tokio::io::duplex(64);
        // Send only the first byte of a frame, then stall
        client.write_all(b"S").await.unwrap();
        let mut reader = FrameReader::new(server);
        let result = reader
            .read_frame_with_timeout(Duration::from_millis(20))
            .await;
        assert_eq!(result, Err(FrameError::FrameTimeout));
    }
}
