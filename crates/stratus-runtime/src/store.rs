//! Opaque local key-value persistence.
//!
//! Upstream layers (token caches, install ids) need a small string store.
//! The pipeline itself persists nothing; this seam exists so hosts can plug
//! in platform storage without the runtime knowing about it.

use dashmap::DashMap;

/// Synchronized string-keyed string storage.
///
/// Implementations must make individual `put`/`get`/`clear` calls safe under
/// concurrent use; no cross-call transaction is offered or required.
pub trait LocalStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: &str);

    /// The value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Remove the value stored under `key`. Removing a missing key is a no-op.
    fn clear(&self, key: &str);
}

/// In-memory store, the default when the host provides no platform storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for MemoryStore {
    fn put(&self, key: &str, value: &str) {
        self.entries.insert(key.to_owned(), value.to_owned());
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    fn clear(&self, key: &str) {
        self.entries.remove(key);
    }
}
