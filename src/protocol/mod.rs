//! Wire Protocol Implementation
//!
//! This module implements the request and reply halves of the server's
//! Redis-like wire format.
//!
//! ## Modules
//!
//! - `frame`: decodes inbound request frames into argument lists
//! - `reply`: the `Reply` type handlers produce, plus its encoding
//!
//! ## Example
//!
//! ```
//! use emberkv::protocol::{decode_command, Reply};
//! use bytes::Bytes;
//!
//! // Decoding an inbound request
//! let (args, consumed) = decode_command(b"*2\r\n$3\r\nGET\r\n$4\r\nname\r\n").unwrap();
//! assert_eq!(args[0], Bytes::from("GET"));
//! assert_eq!(consumed, 23);
//!
//! // Encoding an outbound reply
//! let reply = Reply::bulk(Bytes::from("value"));
//! assert_eq!(reply.encode(), b"$5\r\nvalue\r\n");
//! ```

pub mod frame;
pub mod reply;

// Re-export commonly used types for convenience
pub use frame::{decode_command, FrameError, FrameResult};
pub use reply::Reply;
