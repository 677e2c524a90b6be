//! Error type for frame reading and writing

use std::fmt;
use std::io;

/// Errors produced while reading or writing frames
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Underlying I/O failure
    Io(String),
    /// Connection closed in the middle of a frame
    ConnectionClosed,
    /// Frame did not start with the expected magic bytes
    InvalidMagic,
    /// Type length field was empty or not a number
    InvalidTypeLength,
    /// Type length field had more digits than allowed
    TypeLengthTooManyDigits,
    /// Type length was zero or larger than the maximum type length
    TypeLengthOutOfRange,
    /// Message type is not part of the protocol
    UnknownMessageType(String),
    /// Expected a `|` delimiter but found something else
    MissingDelimiter,
    /// Expected the frame terminator but found something else
    MissingTerminator,
    /// Message ID was not the expected lowercase hex format
    InvalidMessageId,
    /// Payload length field was empty or not a number
    InvalidPayloadLength,
    /// Payload length field had more digits than allowed
    PayloadLengthTooManyDigits,
    /// Payload length exceeds the maximum for this message type
    PayloadLengthExceedsTypeMax {
        message_type: String,
        length: u64,
        max: u64,
    },
    /// Payload was not valid JSON for the declared message type
    InvalidJson(String),
    /// Frame did not complete within the frame timeout
    FrameTimeout,
    /// No data arrived within the idle timeout
    IdleTimeout,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "I/O error: {}", msg),
            Self::ConnectionClosed => write!(f, "connection closed mid-frame"),
            Self::InvalidMagic => write!(f, "invalid frame magic"),
            Self::InvalidTypeLength => write!(f, "invalid type length field"),
            Self::TypeLengthTooManyDigits => write!(f, "type length field too long"),
            Self::TypeLengthOutOfRange => write!(f, "type length out of range"),
            Self::UnknownMessageType(t) => write!(f, "unknown message type '{}'", t),
            Self::MissingDelimiter => write!(f, "missing field delimiter"),
            Self::MissingTerminator => write!(f, "missing frame terminator"),
            Self::InvalidMessageId => write!(f, "invalid message ID"),
            Self::InvalidPayloadLength => write!(f, "invalid payload length field"),
            Self::PayloadLengthTooManyDigits => write!(f, "payload length field too long"),
            Self::PayloadLengthExceedsTypeMax {
                message_type,
                length,
                max,
            } => write!(
                f,
                "payload length {} exceeds maximum {} for message type '{}'",
                length, max, message_type
            ),
            Self::InvalidJson(msg) => write!(f, "invalid JSON payload: {}", msg),
            Self::FrameTimeout => write!(f, "timed out completing frame"),
            Self::IdleTimeout => write!(f, "timed out waiting for data"),
        }
    }
}

impl std::error::Error for FrameError {}

impl From<io::Error> for FrameError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            FrameError::ConnectionClosed
        } else {
            FrameError::Io(e.to_string())
        }
    }
}

impl From<FrameError> for io::Error {
    fn from(err: FrameError) -> Self {
        match err {
            FrameError::Io(msg) => io::Error::other(msg),
            FrameError::ConnectionClosed => {
                io::Error::new(io::ErrorKind::UnexpectedEof, err.to_string())
            }
            FrameError::FrameTimeout | FrameError::IdleTimeout => {
                io::Error::new(io::ErrorKind::TimedOut, err.to_string())
            }
            other => io::Error::new(io::ErrorKind::InvalidData, other.to_string()),
        }
    }
}
