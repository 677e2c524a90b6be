//! Wire framing for protocol messages
//!
//! Every message travels in a single frame:
//!
//! ```text
//! SB|<type_len>|<type>|<msg_id>|<payload_len>|<payload>\n
//! ```
//!
//! The header fields are ASCII; the payload is the JSON-serialized message.
//! Payload sizes are capped per message type, so a malicious peer cannot make
//! the reader allocate unbounded memory before the payload is even read.

mod error;
mod frame;
mod limits;
mod message_id;
mod reader;
mod writer;

pub use error::FrameError;
pub use frame::RawFrame;
pub use limits::{is_known_message_type, max_payload_for_type};
pub use message_id::MessageId;
pub use reader::{DEFAULT_FRAME_TIMEOUT, DEFAULT_IDLE_TIMEOUT, FrameReader};
pub use writer::FrameWriter;

/// Frame magic bytes
pub const MAGIC: &[u8] = b"SB|";

/// Field delimiter within the frame header
pub const DELIMITER: u8 = b'|';

/// Frame terminator
pub const TERMINATOR: u8 = b'\n';

/// Length of a message ID in bytes (lowercase hex characters)
pub const MSG_ID_LENGTH: usize = 12;

/// Maximum length of a message type string
pub const MAX_TYPE_LENGTH: usize = 64;

/// Maximum number of digits in the type length field
pub const MAX_TYPE_LENGTH_DIGITS: usize = 2;

/// Maximum number of digits in the payload length field
pub const MAX_PAYLOAD_LENGTH_DIGITS: usize = 8;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic_ends_with_delimiter() {
        assert_eq!(MAGIC.last(), Some(&DELIMITER));
    }

    #[test]
    fn test_type_length_fits_digit_budget() {
        assert!(MAX_TYPE_LENGTH.to_string().len() <= MAX_TYPE_LENGTH_DIGITS);
    }
}
