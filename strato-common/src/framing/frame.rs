//! Raw frame representation

use super::message_id::MessageId;
use super::{DELIMITER, MAGIC, TERMINATOR};

/// A complete protocol frame before (de)serialization of the payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    /// Message ID for request-response correlation
    pub message_id: MessageId,
    /// Message type string (matches the payload's serde tag)
    pub message_type: String,
    /// JSON payload bytes
    pub payload: Vec<u8>,
}

impl RawFrame {
    /// Create a new frame
    #[must_use]
    pub fn new(message_id: MessageId, message_type: String, payload: Vec<u8>) -> Self {
        Self {
            message_id,
            message_type,
            payload,
        }
    }

    /// Serialize the frame to wire bytes
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let type_len = self.message_type.len().to_string();
        let payload_len = self.payload.len().to_string();

        let mut bytes = Vec::with_capacity(
            MAGIC.len()
                + type_len.len()
                + self.message_type.len()
                + self.message_id.as_bytes().len()
                + payload_len.len()
                + self.payload.len()
                + 5,
        );
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(type_len.as_bytes());
        bytes.push(DELIMITER);
        bytes.extend_from_slice(self.message_type.as_bytes());
        bytes.push(DELIMITER);
        bytes.extend_from_slice(self.message_id.as_bytes());
        bytes.push(DELIMITER);
        bytes.extend_from_slice(payload_len.as_bytes());
        bytes.push(DELIMITER);
        bytes.extend_from_slice(&self.payload);
        bytes.push(TERMINATOR);
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_bytes_layout() {
        let id = MessageId::from_bytes(b"0011223344aa").unwrap();
        let frame = RawFrame::new(id, "Login".to_string(), b"{}".to_vec());
        assert_eq!(frame.to_bytes(), b"SB|5|Login|0011223344aa|2|{}\n");
    }

    #[test]
    fn test_to_bytes_empty_payload() {
        let id = MessageId::from_bytes(b"0011223344aa").unwrap();
        let frame = RawFrame::new(id, "FileList".to_string(), Vec::new());
        assert_eq!(frame.to_bytes(), b"SB|8|FileList|0011223344aa|0|\n");
    }
}
