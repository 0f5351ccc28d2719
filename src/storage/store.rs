//! Key-Value Store with Lazy Expiration
//!
//! A thread-safe mapping from binary key to binary value, where each entry
//! may carry an absolute expiry timestamp in milliseconds.
//!
//! ## Lazy expiration
//!
//! An entry whose `expires_at` is at or before the current time is
//! logically absent: the next access that inspects it removes it and
//! reports not-found. There is no background sweep, so an expired key that
//! is never read again keeps its memory until then. That trade-off is a
//! deliberate property of the design, not a leak to be fixed.
//!
//! ## Concurrency
//!
//! The whole mapping sits behind one `RwLock`. Reads take the read lock on
//! the fast path and only upgrade to the write lock when an expired entry
//! needs removing. No operation holds the lock across an await point, so a
//! `set`/`get`/expiry-check sequence is atomic with respect to every other
//! connection.

use bytes::Bytes;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::storage::clock::{Clock, SystemClock};

/// A stored value with its optional absolute expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEntry {
    /// The value bytes
    pub value: Bytes,
    /// Absolute expiry in clock milliseconds (None = never expires)
    pub expires_at: Option<u64>,
}

impl StoreEntry {
    /// True if the entry is expired as of `now_ms`.
    #[inline]
    fn is_expired_at(&self, now_ms: u64) -> bool {
        self.expires_at.map(|at| at <= now_ms).unwrap_or(false)
    }
}

/// The shared key space every connection reads and mutates.
///
/// Designed to be wrapped in an `Arc` and handed to each session task.
///
/// # Example
///
/// ```
/// use emberkv::storage::KvStore;
/// use bytes::Bytes;
///
/// let store = KvStore::new();
/// store.set(Bytes::from("name"), Bytes::from("ember"), None);
/// assert_eq!(store.get(&Bytes::from("name")), Some(Bytes::from("ember")));
/// ```
pub struct KvStore {
    data: RwLock<HashMap<Bytes, StoreEntry>>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for KvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KvStore").field("len", &self.len()).finish()
    }
}

impl Default for KvStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore {
    /// Creates a store backed by the system wall clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates a store with an injected time source.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Inserts or overwrites an entry.
    ///
    /// The previous value and previous expiry are replaced unconditionally.
    /// With `expire_after_ms`, the entry expires `expire_after_ms`
    /// milliseconds from now; without it, any prior expiry is cleared.
    pub fn set(&self, key: Bytes, value: Bytes, expire_after_ms: Option<u64>) {
        // Saturate: a TTL near u64::MAX means "effectively never", not a
        // wraparound into the past.
        let expires_at = expire_after_ms.map(|ms| self.clock.now_ms().saturating_add(ms));
        let mut data = self.data.write().unwrap();
        data.insert(key, StoreEntry { value, expires_at });
    }

    /// Returns the value for a key, or `None` if absent or expired.
    ///
    /// Reading an expired entry removes it (lazy expiration).
    pub fn get(&self, key: &Bytes) -> Option<Bytes> {
        let now = self.clock.now_ms();

        // Fast path: read lock only, for live entries and plain misses.
        {
            let data = self.data.read().unwrap();
            match data.get(key) {
                Some(entry) if !entry.is_expired_at(now) => {
                    return Some(entry.value.clone());
                }
                Some(_) => {} // expired, fall through to remove it
                None => return None,
            }
        }

        // Expired entry: take the write lock and re-check, since another
        // connection may have overwritten the key in between.
        let mut data = self.data.write().unwrap();
        match data.get(key) {
            Some(entry) if entry.is_expired_at(now) => {
                data.remove(key);
                None
            }
            Some(entry) => Some(entry.value.clone()),
            None => None,
        }
    }

    /// True if the key is present and not expired.
    ///
    /// Performs the same lazy-expiration check as [`get`](Self::get).
    pub fn contains(&self, key: &Bytes) -> bool {
        self.get(key).is_some()
    }

    /// Raw size of the underlying mapping.
    ///
    /// Counts expired entries that have not been touched since expiring,
    /// since those are only reclaimed on access.
    pub fn len(&self) -> usize {
        self.data.read().unwrap().len()
    }

    /// True if the underlying mapping holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
