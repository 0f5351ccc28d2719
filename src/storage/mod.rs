//! Storage Module
//!
//! The shared key space and its time source.
//!
//! ## Example
//!
//! ```
//! use emberkv::storage::{KvStore, ManualClock};
//! use bytes::Bytes;
//! use std::sync::Arc;
//!
//! let clock = Arc::new(ManualClock::new());
//! let store = KvStore::with_clock(clock.clone());
//!
//! store.set(Bytes::from("session"), Bytes::from("token"), Some(100));
//! assert!(store.get(&Bytes::from("session")).is_some());
//!
//! clock.advance(150);
//! assert!(store.get(&Bytes::from("session")).is_none());
//! ```

pub mod clock;
pub mod store;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use store::{KvStore, StoreEntry};
