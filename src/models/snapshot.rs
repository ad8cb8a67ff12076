//! Cache snapshot DTOs
//!
//! Point-in-time view of a cache, ordered MRU to LRU.

use std::fmt;

use serde::Serialize;

use crate::cache::{CacheStats, Value};

/// One key/value pair as seen in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryView {
    /// The cached key
    pub key: String,
    /// The stored value
    pub value: Value,
}

impl EntryView {
    /// Creates a new EntryView
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Serializable view of the whole cache.
#[derive(Debug, Clone, Serialize)]
pub struct CacheSnapshot {
    /// Maximum number of entries
    pub capacity: usize,
    /// Number of live entries
    pub count: usize,
    /// Number of hash chains
    pub bucket_count: usize,
    /// Entries from most to least recently used
    pub entries: Vec<EntryView>,
    /// Counters at snapshot time
    pub stats: CacheStats,
}

impl CacheSnapshot {
    /// Returns the keys in MRU to LRU order.
    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.key.as_str()).collect()
    }
}

impl fmt::Display for CacheSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "--- LRU Cache State (Count: {} / Capacity: {}) ---",
            self.count, self.capacity
        )?;
        write!(f, "MRU -> ")?;
        for entry in &self.entries {
            write!(f, "['{}': {}] -> ", entry.key, entry.value)?;
        }
        write!(f, "LRU")
    }
}
