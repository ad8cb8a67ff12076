//! Cache Entry Module
//!
//! Defines the single owned record per key and the arena that stores it.
//!
//! Every entry carries two structural links: one threading it through its
//! hash chain and one threading it through the recency list. Neither
//! structure owns the entry; both address it through an [`EntryId`].

use std::collections::TryReserveError;

use crate::cache::Value;

// == Entry Id ==
/// Stable handle to an entry slot in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(usize);

impl EntryId {
    /// Returns the slot index.
    pub fn index(self) -> usize {
        self.0
    }
}

// == Link ==
/// Previous/next neighbours of an entry within one linked structure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Link {
    pub prev: Option<EntryId>,
    pub next: Option<EntryId>,
}

// == Entry ==
/// One cached key/value pair.
#[derive(Debug, Clone)]
pub struct Entry {
    /// Owned copy of the key
    pub key: String,
    /// The stored value
    pub value: Value,
    /// djb2 hash of `key`, kept so chain removal never rehashes
    pub hash: u64,
    /// Hash-chain linkage
    pub chain: Link,
    /// Recency-list linkage
    pub recency: Link,
}

impl Entry {
    // == Constructor ==
    /// Creates an unlinked entry.
    pub fn new(key: String, value: Value, hash: u64) -> Self {
        Self {
            key,
            value,
            hash,
            chain: Link::default(),
            recency: Link::default(),
        }
    }
}

// == Entry Arena ==
/// Slot storage for entries with a free list for slot reuse.
#[derive(Debug, Default)]
pub struct EntryArena {
    slots: Vec<Option<Entry>>,
    free_list: Vec<usize>,
    len: usize,
}

impl EntryArena {
    // == Constructor ==
    /// Creates an empty arena. Slots are allocated as entries arrive.
    pub fn new() -> Self {
        Self::default()
    }

    // == Reserve Slot ==
    /// Makes sure the next `insert` needs no allocation.
    ///
    /// A freed slot is reused when available; otherwise room for one more
    /// slot is reserved, together with matching free-list room so that a
    /// later `remove` never reallocates either.
    pub fn reserve_slot(&mut self) -> Result<(), TryReserveError> {
        if !self.free_list.is_empty() || self.slots.len() < self.slots.capacity() {
            return Ok(());
        }
        self.slots.try_reserve(1)?;
        let wanted = self.slots.capacity();
        if self.free_list.capacity() < wanted {
            self.free_list.try_reserve(wanted - self.free_list.len())?;
        }
        Ok(())
    }

    // == Insert ==
    /// Stores an entry and returns its handle, reusing a freed slot when possible.
    pub fn insert(&mut self, entry: Entry) -> EntryId {
        let idx = if let Some(idx) = self.free_list.pop() {
            self.slots[idx] = Some(entry);
            idx
        } else {
            self.slots.push(Some(entry));
            self.slots.len() - 1
        };
        self.len += 1;
        EntryId(idx)
    }

    // == Remove ==
    /// Releases the entry in `id`'s slot and returns it.
    pub fn remove(&mut self, id: EntryId) -> Option<Entry> {
        let entry = self.slots.get_mut(id.0)?.take()?;
        self.free_list.push(id.0);
        self.len -= 1;
        Some(entry)
    }

    /// Returns the entry in `id`'s slot, if live.
    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.slots.get(id.0).and_then(|slot| slot.as_ref())
    }

    /// Returns a mutable reference to the entry in `id`'s slot, if live.
    pub fn get_mut(&mut self, id: EntryId) -> Option<&mut Entry> {
        self.slots.get_mut(id.0).and_then(|slot| slot.as_mut())
    }

    /// Returns `true` if `id` refers to a live entry.
    pub fn contains(&self, id: EntryId) -> bool {
        self.get(id).is_some()
    }

    // == Length ==
    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no entry is live.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Clear ==
    /// Drops every live entry and returns how many were released.
    ///
    /// Reserved storage is kept.
    pub fn clear(&mut self) -> usize {
        let released = self.len;
        self.slots.clear();
        self.free_list.clear();
        self.len = 0;
        released
    }
}
