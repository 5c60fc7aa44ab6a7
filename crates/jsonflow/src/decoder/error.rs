//! Decode errors with byte-exact positions.

use alloc::{string::String, vec::Vec};
use core::fmt;

use thiserror::Error;

use crate::value::escape_string;

/// An error raised while decoding a JSON text.
///
/// Positions are 0-based byte offsets into the logical input: when decoding
/// in chunks, offsets count from the first byte of the first chunk.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Input ended while a token or structure was incomplete.
    #[error("unexpected end of input at position {0}")]
    UnexpectedEof(usize),
    /// A byte not permitted in the current context.
    #[error("unexpected byte at position {position}: {}", render_byte(.byte))]
    UnexpectedByte { position: usize, byte: u8 },
    /// A well-formed slice that fails semantic conversion: a number outside
    /// the representable range, or a malformed/orphaned `\uXXXX` escape.
    /// `token` is the literal source substring.
    #[error("unexpected sequence at position {position}: \"{}\"", render_token(.token))]
    InvalidToken { position: usize, token: String },
    /// A complete value was followed by non-whitespace input.
    #[error("unexpected extra input after valid json: \"{}\"", render_bytes(.extra))]
    TrailingData { extra: Vec<u8> },
}

impl ParseError {
    /// The byte offset the error is anchored to, if any.
    ///
    /// Trailing-data errors carry the trailing bytes instead of an offset.
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        match self {
            ParseError::UnexpectedEof(p)
            | ParseError::UnexpectedByte { position: p, .. }
            | ParseError::InvalidToken { position: p, .. } => Some(*p),
            ParseError::TrailingData { .. } => None,
        }
    }
}

struct ByteDisplay(u8);

impl fmt::Display for ByteDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if crate::decoder::dispatch::is_printable(self.0) {
            write!(f, "0x{:02X} ('{}')", self.0, self.0 as char)
        } else {
            write!(f, "0x{:02X}", self.0)
        }
    }
}

fn render_byte(b: &u8) -> ByteDisplay {
    ByteDisplay(*b)
}

fn render_token(token: &str) -> String {
    escape_string(token)
}

fn render_bytes(bytes: &[u8]) -> String {
    escape_string(&String::from_utf8_lossy(bytes))
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;

    use super::ParseError;

    #[test]
    fn eof_message() {
        let err = ParseError::UnexpectedEof(7);
        assert_eq!(err.to_string(), "unexpected end of input at position 7");
        assert_eq!(err.position(), Some(7));
    }

    #[test]
    fn byte_message_printable() {
        let err = ParseError::UnexpectedByte {
            position: 1,
            byte: b'-',
        };
        assert_eq!(err.to_string(), "unexpected byte at position 1: 0x2D ('-')");
    }

    #[test]
    fn byte_message_non_printable() {
        let err = ParseError::UnexpectedByte {
            position: 3,
            byte: 0x1F,
        };
        assert_eq!(err.to_string(), "unexpected byte at position 3: 0x1F");
    }

    #[test]
    fn token_message_escapes_backslashes() {
        let err = ParseError::InvalidToken {
            position: 7,
            token: "\\udcxx".into(),
        };
        assert_eq!(
            err.to_string(),
            "unexpected sequence at position 7: \"\\\\udcxx\""
        );
    }

    #[test]
    fn trailing_message() {
        let err = ParseError::TrailingData { extra: vec![b'1'] };
        assert_eq!(
            err.to_string(),
            "unexpected extra input after valid json: \"1\""
        );
        assert_eq!(err.position(), None);
    }
}
