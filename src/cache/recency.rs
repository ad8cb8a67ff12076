//! Recency List Module
//!
//! Doubly linked ordering of live entries for LRU eviction.
//!
//! - Front (head) = Most recently used
//! - Back (tail) = Least recently used
//!
//! The list threads through each entry's `recency` link, so every
//! operation is O(1) given the entry handle.

use crate::cache::entry::{EntryArena, EntryId};

// == Recency List ==
/// Head/tail anchors of the recency order.
#[derive(Debug, Default)]
pub struct RecencyList {
    head: Option<EntryId>,
    tail: Option<EntryId>,
    len: usize,
}

impl RecencyList {
    // == Constructor ==
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    // == Push Front ==
    /// Links an unlinked entry as the most recently used.
    ///
    /// Returns `false`, changing nothing, if `id` is not a live entry or is
    /// already in the list.
    pub fn push_front(&mut self, arena: &mut EntryArena, id: EntryId) -> bool {
        let old_head = self.head;
        let Some(entry) = arena.get_mut(id) else {
            return false;
        };
        if self.is_linked(id, entry.recency.prev) {
            return false;
        }
        entry.recency.prev = None;
        entry.recency.next = old_head;

        match old_head {
            Some(head) => {
                if let Some(head_entry) = arena.get_mut(head) {
                    head_entry.recency.prev = Some(id);
                }
            }
            None => self.tail = Some(id),
        }
        self.head = Some(id);
        self.len += 1;
        true
    }

    // == Move To Front ==
    /// Promotes a linked entry to most recently used.
    ///
    /// Returns `false` if `id` is not in the list.
    pub fn move_to_front(&mut self, arena: &mut EntryArena, id: EntryId) -> bool {
        if self.head == Some(id) {
            return true;
        }
        self.remove(arena, id) && self.push_front(arena, id)
    }

    // == Remove ==
    /// Unlinks an arbitrary entry using its own links.
    ///
    /// Returns `false`, changing nothing, if `id` is not in the list.
    pub fn remove(&mut self, arena: &mut EntryArena, id: EntryId) -> bool {
        let Some(entry) = arena.get_mut(id) else {
            return false;
        };
        if !self.is_linked(id, entry.recency.prev) {
            return false;
        }
        let link = std::mem::take(&mut entry.recency);

        match link.prev {
            Some(prev) => {
                if let Some(prev_entry) = arena.get_mut(prev) {
                    prev_entry.recency.next = link.next;
                }
            }
            None => self.head = link.next,
        }

        match link.next {
            Some(next) => {
                if let Some(next_entry) = arena.get_mut(next) {
                    next_entry.recency.prev = link.prev;
                }
            }
            None => self.tail = link.prev,
        }

        self.len -= 1;
        true
    }

    /// An entry is listed iff it has a predecessor or is the head.
    fn is_linked(&self, id: EntryId, prev: Option<EntryId>) -> bool {
        prev.is_some() || self.head == Some(id)
    }

    // == Remove Tail ==
    /// Unlinks and returns the least recently used entry.
    ///
    /// Returns None if the list is empty. The entry stays in the arena.
    pub fn remove_tail(&mut self, arena: &mut EntryArena) -> Option<EntryId> {
        let tail = self.tail?;
        self.remove(arena, tail);
        Some(tail)
    }

    /// Returns the most recently used entry.
    pub fn front(&self) -> Option<EntryId> {
        self.head
    }

    /// Returns the least recently used entry.
    pub fn back(&self) -> Option<EntryId> {
        self.tail
    }

    /// Returns the number of listed entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no entry is listed.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Iterate ==
    /// Iterates entry handles from MRU to LRU.
    pub fn iter<'a>(&self, arena: &'a EntryArena) -> impl Iterator<Item = EntryId> + 'a {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let id = cursor?;
            cursor = arena.get(id).and_then(|entry| entry.recency.next);
            Some(id)
        })
    }

    /// Iterates entry handles from LRU to MRU.
    pub fn iter_rev<'a>(&self, arena: &'a EntryArena) -> impl Iterator<Item = EntryId> + 'a {
        let mut cursor = self.tail;
        std::iter::from_fn(move || {
            let id = cursor?;
            cursor = arena.get(id).and_then(|entry| entry.recency.prev);
            Some(id)
        })
    }

    // == Clear ==
    /// Forgets every entry without touching the arena.
    pub fn clear(&mut self) {
        self.head = None;
        self.tail = None;
        self.len = 0;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::entry::Entry;

    fn setup(keys: &[&str]) -> (EntryArena, RecencyList, Vec<EntryId>) {
        let mut arena = EntryArena::new();
        let mut list = RecencyList::new();
        let ids = keys
            .iter()
            .map(|key| {
                let id = arena.insert(Entry::new(key.to_string(), 0, 0));
                list.push_front(&mut arena, id);
                id
            })
            .collect();
        (arena, list, ids)
    }

    fn keys(list: &RecencyList, arena: &EntryArena) -> Vec<String> {
        list.iter(arena)
            .map(|id| arena.get(id).unwrap().key.clone())
            .collect()
    }

    #[test]
    fn test_list_new() {
        let list = RecencyList::new();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert!(list.front().is_none());
        assert!(list.back().is_none());
    }

    #[test]
    fn test_list_push_front_order() {
        let (arena, list, ids) = setup(&["a", "b", "c"]);

        assert_eq!(list.len(), 3);
        assert_eq!(keys(&list, &arena), vec!["c", "b", "a"]);
        assert_eq!(list.front(), Some(ids[2]));
        assert_eq!(list.back(), Some(ids[0]));
    }

    #[test]
    fn test_list_move_to_front() {
        let (mut arena, mut list, ids) = setup(&["a", "b", "c"]);

        // Move the tail
        list.move_to_front(&mut arena, ids[0]);
        assert_eq!(keys(&list, &arena), vec!["a", "c", "b"]);

        // Move a middle entry
        list.move_to_front(&mut arena, ids[2]);
        assert_eq!(keys(&list, &arena), vec!["c", "a", "b"]);

        // Moving the head is a no-op
        list.move_to_front(&mut arena, ids[2]);
        assert_eq!(keys(&list, &arena), vec!["c", "a", "b"]);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_list_remove_tail() {
        let (mut arena, mut list, ids) = setup(&["a", "b", "c"]);

        assert_eq!(list.remove_tail(&mut arena), Some(ids[0]));
        assert_eq!(list.remove_tail(&mut arena), Some(ids[1]));
        assert_eq!(list.len(), 1);
        assert_eq!(list.front(), list.back());

        assert_eq!(list.remove_tail(&mut arena), Some(ids[2]));
        assert!(list.is_empty());
        assert!(list.front().is_none());
    }

    #[test]
    fn test_list_remove_tail_empty() {
        let mut arena = EntryArena::new();
        let mut list = RecencyList::new();
        assert_eq!(list.remove_tail(&mut arena), None);
    }

    #[test]
    fn test_list_remove_arbitrary() {
        let (mut arena, mut list, ids) = setup(&["a", "b", "c", "d"]);
        // order: d, c, b, a

        list.remove(&mut arena, ids[2]);
        assert_eq!(keys(&list, &arena), vec!["d", "b", "a"]);

        list.remove(&mut arena, ids[3]);
        assert_eq!(keys(&list, &arena), vec!["b", "a"]);
        assert_eq!(list.front(), Some(ids[1]));

        list.remove(&mut arena, ids[0]);
        assert_eq!(keys(&list, &arena), vec!["b"]);
        assert_eq!(list.back(), Some(ids[1]));
    }

    #[test]
    fn test_list_repeated_remove_keeps_order() {
        let (mut arena, mut list, ids) = setup(&["a", "b"]);
        // order: b, a

        assert!(list.remove(&mut arena, ids[0]));
        assert!(!list.remove(&mut arena, ids[0]));

        assert_eq!(list.len(), 1);
        assert_eq!(list.front(), Some(ids[1]));
        assert_eq!(list.back(), Some(ids[1]));
        assert_eq!(keys(&list, &arena), vec!["b"]);
    }

    #[test]
    fn test_list_remove_on_empty_list() {
        let (mut arena, mut list, ids) = setup(&["a"]);
        assert!(list.remove(&mut arena, ids[0]));

        // Would underflow the length without the guard
        assert!(!list.remove(&mut arena, ids[0]));
        assert!(list.is_empty());
        assert_eq!(list.remove_tail(&mut arena), None);
    }

    #[test]
    fn test_list_rejects_double_push_and_dead_handle() {
        let (mut arena, mut list, ids) = setup(&["a", "b"]);

        assert!(!list.push_front(&mut arena, ids[0]));
        assert!(!list.push_front(&mut arena, ids[1]));
        assert_eq!(list.len(), 2);

        list.remove(&mut arena, ids[0]);
        arena.remove(ids[0]);
        assert!(!list.push_front(&mut arena, ids[0]));
        assert!(!list.move_to_front(&mut arena, ids[0]));
        assert_eq!(keys(&list, &arena), vec!["b"]);
    }

    #[test]
    fn test_list_reverse_matches_forward() {
        let (mut arena, mut list, ids) = setup(&["a", "b", "c", "d"]);
        list.move_to_front(&mut arena, ids[1]);

        let forward: Vec<EntryId> = list.iter(&arena).collect();
        let mut backward: Vec<EntryId> = list.iter_rev(&arena).collect();
        backward.reverse();

        assert_eq!(forward, backward);
    }

    #[test]
    fn test_list_clear() {
        let (arena, mut list, _ids) = setup(&["a", "b"]);
        list.clear();

        assert!(list.is_empty());
        assert_eq!(list.iter(&arena).count(), 0);
    }
}
