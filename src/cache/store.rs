//! Cache Store Module
//!
//! Main cache engine keeping the hash index and the recency list in sync.
//!
//! Every public operation first consults the index, then updates recency.
//! When a new key arrives at capacity the recency tail is removed from both
//! structures and released before the new entry is linked in, so the entry
//! count never exceeds capacity.

use tracing::{debug, trace, warn};

use crate::cache::{djb2, CacheStats, Entry, EntryArena, EntryId, HashIndex, RecencyList, Value};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{CacheSnapshot, EntryView};

// == LRU Cache ==
/// Fixed-capacity least-recently-used cache.
///
/// Not internally synchronized; wrap it in a lock to share across threads.
#[derive(Debug)]
pub struct LruCache {
    /// Owner of every live entry
    arena: EntryArena,
    /// Key lookup
    index: HashIndex,
    /// MRU-to-LRU order
    recency: RecencyList,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
    /// Number of live entries
    count: usize,
    /// Forces the next entry reservation to fail
    #[cfg(test)]
    fail_next_alloc: bool,
}

impl LruCache {
    // == Constructor ==
    /// Creates an empty cache.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries the cache can hold
    /// * `bucket_count` - Number of hash chains in the index
    ///
    /// # Errors
    /// `InvalidCapacity` or `InvalidBucketCount` for zero arguments,
    /// `AllocationFailure` if the bucket array cannot be reserved. Entry
    /// storage is not reserved here; it grows as keys are inserted.
    pub fn new(capacity: usize, bucket_count: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity);
        }
        let index = HashIndex::new(bucket_count)?;
        let arena = EntryArena::new();

        debug!(capacity, bucket_count, "created LRU cache");

        Ok(Self {
            arena,
            index,
            recency: RecencyList::new(),
            stats: CacheStats::new(),
            capacity,
            count: 0,
            #[cfg(test)]
            fail_next_alloc: false,
        })
    }

    /// Creates a cache sized by the given configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.capacity, config.bucket_count)
    }

    // == Get ==
    /// Retrieves a value by key, promoting it to most recently used.
    ///
    /// A miss returns None and leaves the order untouched.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        let Some(id) = self.index.find(&self.arena, key) else {
            self.stats.record_miss();
            return None;
        };

        self.recency.move_to_front(&mut self.arena, id);
        self.stats.record_hit();
        trace!(key, "promoted on read");
        self.arena.get(id).map(|entry| entry.value)
    }

    // == Put ==
    /// Inserts or updates a key.
    ///
    /// An existing key is overwritten in place and promoted. A new key at
    /// capacity evicts exactly the least recently used entry first.
    ///
    /// # Errors
    /// `AllocationFailure` if the key copy or the entry slot cannot be
    /// allocated. The cache is left exactly as it was.
    pub fn put(&mut self, key: &str, value: Value) -> Result<()> {
        if let Some(id) = self.index.find(&self.arena, key) {
            if let Some(entry) = self.arena.get_mut(id) {
                entry.value = value;
            }
            self.recency.move_to_front(&mut self.arena, id);
            trace!(key, "promoted on update");
            return Ok(());
        }

        // Allocate before evicting so a failure changes nothing
        let owned = self.reserve_entry(key).map_err(|err| {
            warn!(key, error = %err, "failed to allocate cache entry");
            err
        })?;

        if self.count >= self.capacity {
            self.evict_lru();
        }

        let id = self.arena.insert(Entry::new(owned, value, djb2(key)));
        self.index.insert(&mut self.arena, id);
        self.recency.push_front(&mut self.arena, id);
        self.count += 1;

        Ok(())
    }

    // == Remove ==
    /// Removes a key from both structures and returns its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let id = self.index.find(&self.arena, key)?;
        self.unlink(id).map(|entry| entry.value)
    }

    // == Peek ==
    /// Returns a value without promoting it or touching statistics.
    pub fn peek(&self, key: &str) -> Option<Value> {
        let id = self.index.find(&self.arena, key)?;
        self.arena.get(id).map(|entry| entry.value)
    }

    /// Checks whether a key is present, without promoting it.
    pub fn contains(&self, key: &str) -> bool {
        self.index.find(&self.arena, key).is_some()
    }

    // == Clear ==
    /// Releases every entry, keeping capacity and bucket count.
    pub fn clear(&mut self) {
        self.index.clear();
        self.recency.clear();
        let released = self.arena.clear();
        self.count = 0;
        debug!(released, "cleared LRU cache");
    }

    // == Destroy ==
    /// Tears the cache down, releasing every live entry exactly once.
    ///
    /// Returns the number of entries released.
    pub fn destroy(mut self) -> usize {
        let mut released = 0;
        while let Some(id) = self.recency.remove_tail(&mut self.arena) {
            self.index.remove(&mut self.arena, id);
            if self.arena.remove(id).is_some() {
                released += 1;
            }
        }
        self.count = 0;
        debug!(released, "destroyed LRU cache");
        released
    }

    // == Dump ==
    /// Returns every (key, value) pair from MRU to LRU.
    pub fn dump(&self) -> Vec<(String, Value)> {
        self.recency
            .iter(&self.arena)
            .filter_map(|id| self.arena.get(id))
            .map(|entry| (entry.key.clone(), entry.value))
            .collect()
    }

    /// Returns a serializable view of the cache.
    pub fn snapshot(&self) -> CacheSnapshot {
        CacheSnapshot {
            capacity: self.capacity,
            count: self.count,
            bucket_count: self.index.bucket_count(),
            entries: self
                .dump()
                .into_iter()
                .map(|(key, value)| EntryView::new(key, value))
                .collect(),
            stats: self.stats(),
        }
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.count);
        stats
    }

    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of hash chains.
    pub fn bucket_count(&self) -> usize {
        self.index.bucket_count()
    }

    // == Internal Helpers ==
    /// Obtains the key copy and, when no eviction will free one, an arena slot.
    fn reserve_entry(&mut self, key: &str) -> Result<String> {
        #[cfg(test)]
        if std::mem::take(&mut self.fail_next_alloc) {
            Vec::<u8>::new().try_reserve(usize::MAX)?;
        }
        let owned = copy_key(key)?;
        if self.count < self.capacity {
            self.arena.reserve_slot()?;
        }
        Ok(owned)
    }

    /// Removes the recency tail from both structures and frees it.
    fn evict_lru(&mut self) {
        let Some(id) = self.recency.back() else {
            return;
        };
        if let Some(evicted) = self.unlink(id) {
            self.stats.record_eviction();
            debug!(key = %evicted.key, value = evicted.value, "evicted least recently used entry");
        }
    }

    /// Unlinks an entry from the index and the list, then releases it.
    fn unlink(&mut self, id: EntryId) -> Option<Entry> {
        self.index.remove(&mut self.arena, id);
        self.recency.remove(&mut self.arena, id);
        let entry = self.arena.remove(id)?;
        self.count -= 1;
        Some(entry)
    }

    /// Makes the next new-key `put` fail as if memory were exhausted.
    #[cfg(test)]
    pub(crate) fn fail_next_allocation(&mut self) {
        self.fail_next_alloc = true;
    }

    /// Checks that the index, the list and the count describe the same set.
    #[cfg(test)]
    pub(crate) fn validate_invariants(&self) -> std::result::Result<(), String> {
        use std::collections::HashSet;

        if self.count > self.capacity {
            return Err(format!("count {} exceeds capacity {}", self.count, self.capacity));
        }
        if self.count != self.recency.len() || self.count != self.arena.len() {
            return Err(format!(
                "count {} disagrees with list length {} or arena length {}",
                self.count,
                self.recency.len(),
                self.arena.len()
            ));
        }

        let forward: Vec<EntryId> = self.recency.iter(&self.arena).collect();
        let mut backward: Vec<EntryId> = self.recency.iter_rev(&self.arena).collect();
        backward.reverse();
        if forward != backward || forward.len() != self.count {
            return Err("recency links are not symmetric".to_string());
        }

        let mut indexed = HashSet::new();
        for bucket in 0..self.index.bucket_count() {
            for id in self.index.chain(&self.arena, bucket) {
                let entry = self
                    .arena
                    .get(id)
                    .ok_or_else(|| format!("dangling handle {:?} in bucket {}", id, bucket))?;
                if self.index.bucket_of(entry.hash) != bucket {
                    return Err(format!("key {} chained in wrong bucket", entry.key));
                }
                if !indexed.insert(entry.key.clone()) {
                    return Err(format!("key {} indexed twice", entry.key));
                }
            }
        }

        let listed: HashSet<String> = forward
            .iter()
            .filter_map(|id| self.arena.get(*id))
            .map(|entry| entry.key.clone())
            .collect();
        if listed != indexed {
            return Err("index and recency list hold different keys".to_string());
        }
        Ok(())
    }
}

// == Utility Functions ==
/// Copies a key into owned storage, reporting allocation failure.
fn copy_key(key: &str) -> Result<String> {
    let mut owned = String::new();
    owned.try_reserve_exact(key.len())?;
    owned.push_str(key);
    Ok(owned)
}
