//! Cache Module
//!
//! Fixed-capacity LRU cache built from a chained hash index and a
//! recency list that share one arena of entries.

mod entry;
mod hash_index;
mod recency;
mod stats;
mod store;


// Re-export public types
pub use entry::{Entry, EntryArena, EntryId, Link};
pub use hash_index::{djb2, HashIndex};
pub use recency::RecencyList;
pub use stats::CacheStats;
pub use store::LruCache;

// == Public Types ==
/// The single value kind stored by the cache.
pub type Value = i32;
