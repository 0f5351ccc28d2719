//! Session Module
//!
//! One async task per client connection. The accept loop in `main.rs`
//! hands each accepted stream to [`handle_connection`], which decodes
//! frames, dispatches commands, and writes replies until the stream ends.
//!
//! ## Example
//!
//! ```ignore
//! use emberkv::session::{handle_connection, SessionStats};
//! use emberkv::commands::CommandTable;
//! use std::sync::Arc;
//!
//! let stats = Arc::new(SessionStats::new());
//!
//! // For each accepted connection...
//! let (stream, addr) = listener.accept().await?;
//! tokio::spawn(handle_connection(stream, addr, Arc::clone(&commands), Arc::clone(&stats)));
//! ```

pub mod handler;

// Re-export commonly used types
pub use handler::{handle_connection, Session, SessionError, SessionStats};
