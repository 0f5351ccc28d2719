//! # emberkv - An In-Memory Key-Value Server
//!
//! emberkv is a single-process, in-memory key-value server speaking a
//! Redis-like request protocol over TCP. Clients send length-prefixed
//! command frames; the server decodes them, dispatches to a command
//! table, reads or mutates the shared key space, and writes back an
//! encoded reply.
//!
//! ## Features
//!
//! - **Redis-like wire format**: `*N` / `$len` framed requests, typed replies
//! - **Millisecond TTLs**: `SET ... PX <ms>` with lazy expiration on read
//! - **Async I/O**: one Tokio task per connection, pipelining supported
//! - **Deterministic time**: the expiry clock is injected, so tests never sleep
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          emberkv                             │
//! │                                                              │
//! │  ┌────────────┐    ┌────────────┐    ┌──────────────┐        │
//! │  │ TCP Server │───>│  Session   │───>│ CommandTable │        │
//! │  │ (Listener) │    │  (1/conn)  │    │  (dispatch)  │        │
//! │  └────────────┘    └─────┬──────┘    └──────┬───────┘        │
//! │                          │                  │                │
//! │                          ▼                  ▼                │
//! │  ┌──────────────────────────────┐    ┌──────────────┐        │
//! │  │          protocol            │    │   KvStore    │        │
//! │  │  frame decoder │ reply enc.  │    │ (RwLock map) │        │
//! │  └──────────────────────────────┘    └──────────────┘        │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Data flow: inbound bytes → frame decoder → argument list →
//! command table (reads/mutates the store) → reply → outbound bytes.
//!
//! ## Supported Commands
//!
//! - `PING`
//! - `ECHO message`
//! - `SET key value [PX milliseconds]`
//! - `GET key`
//! - `CONFIG GET parameter` (`dir`, `dbfilename`)
//!
//! ## Module Overview
//!
//! - [`protocol`]: request frame decoder and reply encoder
//! - [`storage`]: the shared key space with lazy millisecond expiration
//! - [`commands`]: the explicit command dispatch table
//! - [`session`]: per-connection task driving decode/dispatch/reply
//! - [`config`]: startup configuration exposed through `CONFIG GET`
//!
//! ## Design Highlights
//!
//! ### Lazy expiration
//!
//! A key whose expiry timestamp has passed is treated as absent by the
//! very next read that touches it, and removed at that moment. There is
//! no background sweep; memory for expired-but-never-read keys is only
//! reclaimed on access. That is a documented property of the design.
//!
//! ### Relaxed framing
//!
//! The frame decoder trusts `\r\n` line boundaries rather than the
//! declared `$<len>` prefixes, matching the behavior this server was
//! modeled on. Arguments may hold any bytes that do not contain the
//! delimiter sequence.

pub mod commands;
pub mod config;
pub mod protocol;
pub mod session;
pub mod storage;

// Re-export commonly used types for convenience
pub use commands::CommandTable;
pub use config::ServerConfig;
pub use protocol::{decode_command, FrameError, Reply};
pub use session::{handle_connection, SessionStats};
pub use storage::{Clock, KvStore, SystemClock};

/// The default port emberkv listens on (same as Redis)
pub const DEFAULT_PORT: u16 = config::DEFAULT_PORT;

/// The default host emberkv binds to
pub const DEFAULT_HOST: &str = config::DEFAULT_HOST;

/// Version of emberkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
