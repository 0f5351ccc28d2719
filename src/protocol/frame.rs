//! Request Frame Decoder
//!
//! Decodes one client command from a raw byte buffer. A request frame is a
//! length-prefixed array of bulk strings:
//!
//! ```text
//! *<N>\r\n
//! $<len_1>\r\n
//! <arg_1>\r\n
//! ...
//! $<len_N>\r\n
//! <arg_N>\r\n
//! ```
//!
//! ## Relaxed framing
//!
//! Decoding is line-oriented: the buffer is split at `\r\n` and the
//! declared `$<len>` values are not cross-checked against the data lines.
//! Line boundaries are authoritative, which makes the decoder tolerant of
//! any argument bytes that do not contain the delimiter sequence.
//!
//! ## Partial buffers
//!
//! The decoder returns the argument list together with the byte offset
//! where the frame ended, so a session can keep trailing bytes around for
//! pipelined commands. A buffer that does not yet hold a whole frame
//! produces [`FrameError::Incomplete`], which callers treat as "read more
//! bytes", not as a protocol violation.

use bytes::Bytes;
use thiserror::Error;

use crate::protocol::reply::{prefix, CRLF};

/// Errors produced while decoding a request frame.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// The buffer does not yet contain a complete frame.
    #[error("Incomplete RESP data")]
    Incomplete,

    /// The header declared no elements at all.
    ///
    /// Unlike [`Incomplete`](Self::Incomplete) this is a protocol error:
    /// no amount of further input can complete such a frame, so the
    /// session answers it instead of waiting for more bytes.
    #[error("Incomplete RESP data")]
    EmptyFrame,

    /// The array header line is missing or malformed.
    #[error("Invalid RESP data")]
    Invalid,

    /// An argument is missing its `$` length marker.
    #[error("Invalid RESP argument format")]
    BadArgument,
}

/// Result type for frame decoding.
pub type FrameResult<T> = Result<T, FrameError>;

/// Maximum number of elements a single frame may declare.
///
/// The header count is client-controlled and must be bounded before any
/// allocation sized by it.
pub const MAX_FRAME_ELEMENTS: usize = 1024 * 1024;

/// Decodes the next command from `buf`.
///
/// # Returns
///
/// The ordered argument list (`args[0]` is the command name) and the byte
/// offset one past the frame's final `\r\n`.
pub fn decode_command(buf: &[u8]) -> FrameResult<(Vec<Bytes>, usize)> {
    let mut lines = Lines::new(buf);

    let header = lines.next().ok_or(FrameError::Incomplete)?;
    if header.first() != Some(&prefix::ARRAY) {
        return Err(FrameError::Invalid);
    }

    let count: i64 = std::str::from_utf8(&header[1..])
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or(FrameError::Invalid)?;

    if count <= 0 {
        return Err(FrameError::EmptyFrame);
    }

    let count = count as usize;
    if count > MAX_FRAME_ELEMENTS {
        return Err(FrameError::Invalid);
    }

    // Each element needs a marker line and a data line, at least five
    // bytes, so the buffer length also bounds the pre-reservation.
    let mut args = Vec::with_capacity(count.min(buf.len() / 4));
    for _ in 0..count {
        let marker = lines.next().ok_or(FrameError::Incomplete)?;
        if marker.first() != Some(&prefix::BULK_STRING) {
            return Err(FrameError::BadArgument);
        }
        // The declared length is not authoritative; the next delimiter
        // decides where the argument ends.

        let data = lines.next().ok_or(FrameError::Incomplete)?;
        args.push(Bytes::copy_from_slice(data));
    }

    Ok((args, lines.pos()))
}

/// Iterator over `\r\n`-terminated lines that tracks its byte position.
struct Lines<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Lines<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Byte offset one past the last consumed `\r\n`.
    fn pos(&self) -> usize {
        self.pos
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        let rest = &self.buf[self.pos..];
        let at = find_crlf(rest)?;
        let line = &rest[..at];
        self.pos += at + CRLF.len();
        Some(line)
    }
}

/// Finds the position of `\r\n` in the buffer, if present.
#[inline]
fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == CRLF)
}
