//! Message IDs for request-response correlation
//!
//! Every frame carries a 12-character lowercase hex ID. The requester picks
//! the ID; the responder echoes it back, letting a client match a response to
//! the request it sent.

use std::fmt;

use rand::RngExt;

use super::MSG_ID_LENGTH;
use super::error::FrameError;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// A frame message ID (12 lowercase hex characters)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId([u8; MSG_ID_LENGTH]);

impl MessageId {
    /// Generate a fresh random message ID
    #[must_use]
    pub fn new() -> Self {
        let mut rng = rand::rng();
        let mut bytes = [0u8; MSG_ID_LENGTH];
        for byte in &mut bytes {
            *byte = HEX_DIGITS[rng.random_range(0..HEX_DIGITS.len())];
        }
        Self(bytes)
    }

    /// Construct a message ID from raw bytes
    ///
    /// # Errors
    ///
    /// Returns `FrameError::InvalidMessageId` if the slice is not exactly
    /// 12 lowercase hex characters.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FrameError> {
        let array: [u8; MSG_ID_LENGTH] = bytes
            .try_into()
            .map_err(|_| FrameError::InvalidMessageId)?;
        for byte in &array {
            let valid = byte.is_ascii_digit() || (b'a'..=b'f').contains(byte);
            if !valid {
                return Err(FrameError::InvalidMessageId);
            }
        }
        Ok(Self(array))
    }

    /// The ID as raw bytes, for writing into a frame header
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Constructors guarantee the bytes are ASCII hex
        for byte in &self.0 {
            write!(f, "{}", *byte as char)?;
        }
        Ok(())
    }
}
