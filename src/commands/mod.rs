//! Command Layer
//!
//! Receives decoded argument lists, executes them against the storage
//! engine and configuration, and produces a [`Reply`](crate::protocol::Reply)
//! for the session to encode.
//!
//! ```text
//! Client Request
//!       │
//!       ▼
//! ┌─────────────────┐
//! │  Frame Decoder  │  (protocol module)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  CommandTable   │  (this module)
//! │                 │
//! │  - Lookup       │
//! │  - Validate     │
//! │  - Execute      │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │     KvStore     │  (storage module)
//! └─────────────────┘
//! ```

pub mod dispatch;

// Re-export the dispatch table
pub use dispatch::CommandTable;
