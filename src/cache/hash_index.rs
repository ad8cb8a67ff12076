//! Hash Index Module
//!
//! Fixed-size table of bucket chains mapping a key to its entry.
//!
//! Collisions are resolved by separate chaining. Each chain is threaded
//! through the entries' own `chain` links, so the table stores only the
//! head handle per bucket and removal needs no chain scan.

use crate::cache::entry::{EntryArena, EntryId};
use crate::error::{CacheError, Result};

// == Hash Function ==
/// djb2 string hash: seed 5381, `hash * 33 + byte`.
pub fn djb2(key: &str) -> u64 {
    key.bytes().fold(5381u64, |hash, byte| {
        hash.wrapping_shl(5)
            .wrapping_add(hash)
            .wrapping_add(u64::from(byte))
    })
}

// == Hash Index ==
/// Bucket array of chain heads.
#[derive(Debug)]
pub struct HashIndex {
    buckets: Vec<Option<EntryId>>,
}

impl HashIndex {
    // == Constructor ==
    /// Allocates `bucket_count` empty chains.
    pub fn new(bucket_count: usize) -> Result<Self> {
        if bucket_count == 0 {
            return Err(CacheError::InvalidBucketCount);
        }

        let mut buckets = Vec::new();
        buckets.try_reserve_exact(bucket_count)?;
        buckets.resize(bucket_count, None);

        Ok(Self { buckets })
    }

    /// Returns the number of chains.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Maps a hash to its bucket.
    pub fn bucket_of(&self, hash: u64) -> usize {
        (hash % self.buckets.len() as u64) as usize
    }

    // == Find ==
    /// Scans the key's chain and returns the matching entry, if any.
    pub fn find(&self, arena: &EntryArena, key: &str) -> Option<EntryId> {
        let hash = djb2(key);
        let mut cursor = self.buckets[self.bucket_of(hash)];

        while let Some(id) = cursor {
            let entry = arena.get(id)?;
            if entry.hash == hash && entry.key == key {
                return Some(id);
            }
            cursor = entry.chain.next;
        }
        None
    }

    // == Insert ==
    /// Links `id` at the head of its chain.
    ///
    /// The caller guarantees no entry with the same key is already indexed.
    /// Returns `false`, changing nothing, if `id` is not a live entry or is
    /// already chained.
    pub fn insert(&mut self, arena: &mut EntryArena, id: EntryId) -> bool {
        let Some(entry) = arena.get(id) else {
            return false;
        };
        let bucket = self.bucket_of(entry.hash);
        if self.is_linked(bucket, id, entry.chain.prev) {
            return false;
        }
        let old_head = self.buckets[bucket];

        if let Some(entry) = arena.get_mut(id) {
            entry.chain.prev = None;
            entry.chain.next = old_head;
        }
        if let Some(head) = old_head {
            if let Some(head_entry) = arena.get_mut(head) {
                head_entry.chain.prev = Some(id);
            }
        }
        self.buckets[bucket] = Some(id);
        true
    }

    // == Remove ==
    /// Unlinks `id` from its chain using its own links.
    ///
    /// Returns `false`, changing nothing, if `id` is not currently chained.
    pub fn remove(&mut self, arena: &mut EntryArena, id: EntryId) -> bool {
        let Some(entry) = arena.get_mut(id) else {
            return false;
        };
        let bucket = (entry.hash % self.buckets.len() as u64) as usize;
        if !self.is_linked(bucket, id, entry.chain.prev) {
            return false;
        }
        let link = std::mem::take(&mut entry.chain);

        match link.prev {
            Some(prev) => {
                if let Some(prev_entry) = arena.get_mut(prev) {
                    prev_entry.chain.next = link.next;
                }
            }
            None => self.buckets[bucket] = link.next,
        }

        if let Some(next) = link.next {
            if let Some(next_entry) = arena.get_mut(next) {
                next_entry.chain.prev = link.prev;
            }
        }
        true
    }

    /// An entry is chained iff it has a predecessor or heads its bucket.
    fn is_linked(&self, bucket: usize, id: EntryId, prev: Option<EntryId>) -> bool {
        prev.is_some() || self.buckets[bucket] == Some(id)
    }

    /// Counts the entries chained in `bucket`.
    pub fn chain_len(&self, arena: &EntryArena, bucket: usize) -> usize {
        self.chain(arena, bucket).count()
    }

    /// Iterates the entry handles chained in `bucket`, head first.
    pub fn chain<'a>(
        &'a self,
        arena: &'a EntryArena,
        bucket: usize,
    ) -> impl Iterator<Item = EntryId> + 'a {
        let mut cursor = self.buckets.get(bucket).copied().flatten();
        std::iter::from_fn(move || {
            let id = cursor?;
            cursor = arena.get(id).and_then(|entry| entry.chain.next);
            Some(id)
        })
    }

    // == Clear ==
    /// Empties every chain without touching the arena.
    pub fn clear(&mut self) {
        self.buckets.iter_mut().for_each(|head| *head = None);
    }
}
