//! Reply Types and Wire Encoding
//!
//! This module defines the `Reply` value every command handler produces,
//! and the one place in the crate that knows how to serialize each variant
//! to the wire.
//!
//! ## Response encodings
//!
//! Simple status: `+OK\r\n`
//! Error: `-ERR unknown command\r\n`
//! Bulk string: `$5\r\nhello\r\n`
//! Nil bulk string: `$-1\r\n`
//! Array: `*2\r\n$3\r\ndir\r\n$4\r\n/tmp\r\n`

use bytes::Bytes;
use std::fmt;

/// The CRLF terminator used throughout the protocol
pub const CRLF: &[u8] = b"\r\n";

/// Protocol type prefixes
pub mod prefix {
    pub const SIMPLE_STRING: u8 = b'+';
    pub const ERROR: u8 = b'-';
    pub const BULK_STRING: u8 = b'$';
    pub const ARRAY: u8 = b'*';
}

/// A reply to be sent back to the client.
///
/// This is the single shape every command handler returns. Encoding is
/// total: every `Reply` has exactly one wire representation and no
/// failure path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Non-binary-safe status line. Must not contain CRLF.
    /// Format: `+<string>\r\n`
    Simple(String),

    /// Error condition reported to the client.
    /// Format: `-<error message>\r\n`
    Error(String),

    /// Binary-safe string; `None` encodes the protocol nil (`$-1\r\n`).
    /// Format: `$<length>\r\n<data>\r\n`
    Bulk(Option<Bytes>),

    /// Sequence of replies. Empty array encodes as `*0\r\n`.
    /// Format: `*<count>\r\n<element1><element2>...`
    Array(Vec<Reply>),
}

impl Reply {
    /// Creates a simple status reply.
    pub fn simple(s: impl Into<String>) -> Self {
        Reply::Simple(s.into())
    }

    /// Creates an error reply.
    pub fn error(s: impl Into<String>) -> Self {
        Reply::Error(s.into())
    }

    /// Creates a bulk string reply.
    pub fn bulk(data: impl Into<Bytes>) -> Self {
        Reply::Bulk(Some(data.into()))
    }

    /// Creates the nil bulk string reply.
    pub fn nil() -> Self {
        Reply::Bulk(None)
    }

    /// Creates an array reply.
    pub fn array(items: Vec<Reply>) -> Self {
        Reply::Array(items)
    }

    /// The canonical success reply.
    pub fn ok() -> Self {
        Reply::Simple("OK".to_string())
    }

    /// The canonical PING reply.
    pub fn pong() -> Self {
        Reply::Simple("PONG".to_string())
    }

    /// Returns true if this reply is an error.
    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error(_))
    }

    /// Serializes the reply to a fresh byte buffer.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.encode_into(&mut buf);
        buf
    }

    /// Serializes the reply into an existing buffer.
    ///
    /// More efficient than `encode()` when a buffer is being reused.
    pub fn encode_into(&self, buf: &mut Vec<u8>) {
        match self {
            Reply::Simple(s) => {
                buf.push(prefix::SIMPLE_STRING);
                buf.extend_from_slice(s.as_bytes());
                buf.extend_from_slice(CRLF);
            }
            Reply::Error(s) => {
                buf.push(prefix::ERROR);
                buf.extend_from_slice(s.as_bytes());
                buf.extend_from_slice(CRLF);
            }
            Reply::Bulk(Some(data)) => {
                buf.push(prefix::BULK_STRING);
                buf.extend_from_slice(data.len().to_string().as_bytes());
                buf.extend_from_slice(CRLF);
                buf.extend_from_slice(data);
                buf.extend_from_slice(CRLF);
            }
            Reply::Bulk(None) => {
                buf.push(prefix::BULK_STRING);
                buf.extend_from_slice(b"-1");
                buf.extend_from_slice(CRLF);
            }
            Reply::Array(items) => {
                buf.push(prefix::ARRAY);
                buf.extend_from_slice(items.len().to_string().as_bytes());
                buf.extend_from_slice(CRLF);
                for item in items {
                    item.encode_into(buf);
                }
            }
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Simple(s) => write!(f, "\"{}\"", s),
            Reply::Error(s) => write!(f, "(error) {}", s),
            Reply::Bulk(Some(data)) => {
                if let Ok(s) = std::str::from_utf8(data) {
                    write!(f, "\"{}\"", s)
                } else {
                    write!(f, "(binary data, {} bytes)", data.len())
                }
            }
            Reply::Bulk(None) => write!(f, "(nil)"),
            Reply::Array(items) => {
                if items.is_empty() {
                    write!(f, "(empty array)")
                } else {
                    writeln!(f)?;
                    for (i, item) in items.iter().enumerate() {
                        writeln!(f, "{}) {}", i + 1, item)?;
                    }
                    Ok(())
                }
            }
        }
    }
}
